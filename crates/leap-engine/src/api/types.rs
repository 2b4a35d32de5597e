use bytemuck::{Pod, Zeroable};

/// Stable identifier for an entity in the registry.
/// Ids are handed out monotonically and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

/// Classification used for kind-based lookups.
/// Games with more than the built-in kinds use `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    /// Level geometry (walls, floors) and anything else that never moves.
    #[default]
    Static,
    Player,
    Enemy,
    Bullet,
    Pickup,
    /// HUD and overlay elements.
    Ui,
    Custom(u16),
}

impl EntityKind {
    /// Numeric code written into the render snapshot.
    pub fn code(self) -> f32 {
        match self {
            EntityKind::Static => 0.0,
            EntityKind::Player => 1.0,
            EntityKind::Enemy => 2.0,
            EntityKind::Bullet => 3.0,
            EntityKind::Pickup => 4.0,
            EntityKind::Ui => 5.0,
            EntityKind::Custom(n) => 16.0 + n as f32,
        }
    }
}

/// A game event published through the context's event queue.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
/// Also forwarded verbatim to the JavaScript layer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
