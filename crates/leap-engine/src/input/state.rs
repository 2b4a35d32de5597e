use glam::Vec2;

use crate::input::queue::InputEvent;

pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_X: u32 = 88;
pub const KEY_Z: u32 = 90;

/// Logical controls the gameplay layer polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Control {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
    Jump = 4,
    Shoot = 5,
}

impl Control {
    /// Default keyboard binding: arrows to move, X to jump, Z to shoot.
    pub fn from_key_code(key_code: u32) -> Option<Self> {
        match key_code {
            KEY_LEFT => Some(Control::Left),
            KEY_RIGHT => Some(Control::Right),
            KEY_UP => Some(Control::Up),
            KEY_DOWN => Some(Control::Down),
            KEY_X => Some(Control::Jump),
            KEY_Z => Some(Control::Shoot),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Read-only snapshot of which controls are held, refreshed before each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    held: u8,
    pointer: Vec2,
    pointer_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held & control.bit() != 0
    }

    /// Last known pointer position in world coordinates.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub fn set_held(&mut self, control: Control, held: bool) {
        if held {
            self.held |= control.bit();
        } else {
            self.held &= !control.bit();
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code } => {
                if let Some(control) = Control::from_key_code(key_code) {
                    self.set_held(control, true);
                }
            }
            InputEvent::KeyUp { key_code } => {
                if let Some(control) = Control::from_key_code(key_code) {
                    self.set_held(control, false);
                }
            }
            InputEvent::PointerDown { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.pointer_down = true;
            }
            InputEvent::PointerUp { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.pointer_down = false;
            }
            InputEvent::PointerMove { x, y } => {
                self.pointer = Vec2::new(x, y);
            }
        }
    }

    /// Release everything (e.g. when the page loses focus).
    pub fn release_all(&mut self) {
        self.held = 0;
        self.pointer_down = false;
    }
}
