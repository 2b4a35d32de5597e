use glam::Vec2;
use leap_engine::*;

use crate::bullet;
use crate::enemy::CONTACT_DAMAGE;
use crate::game::{EVENT_HEALTH_CHANGED, SPRITE_ATLAS};

pub const MAX_HEALTH: i32 = 10;
const SIZE: Vec2 = Vec2::new(14.0, 14.0);

const SPEED: f32 = 5.0;
const GRAVITY: f32 = 0.5;
const JUMP_VELOCITY: f32 = 11.0;
const MAX_FALL_SPEED: f32 = 10.0;

const FLICKER_TICKS: i32 = 90;
const SHOOT_COOLDOWN: i32 = 12;
const BULLET_SPEED: f32 = 8.0;

const SHAKE_INTENSITY: f32 = 4.0;
const SHAKE_TICKS: u32 = 20;

/// Keyboard-driven player: runs, jumps, shoots, and flickers after a hit.
#[derive(Debug, Clone)]
pub struct Player {
    health: i32,
    vy: f32,
    /// -1 facing left, 1 facing right.
    facing: f32,
    facing_up: bool,
    jumping: bool,
    /// Remaining flicker ticks while invulnerable.
    flicker: Option<i32>,
    shoot_cooldown: i32,
    bullet_targets: GroupId,
}

impl Player {
    pub fn new(bullet_targets: GroupId) -> Self {
        Self {
            health: MAX_HEALTH,
            vy: 0.0,
            facing: 1.0,
            facing_up: false,
            jumping: false,
            flicker: None,
            shoot_cooldown: 0,
            bullet_targets,
        }
    }

    fn take_damage(&mut self, owner: EntityId, amount: i32, ctx: &mut EngineContext) {
        let previous = self.health;
        self.health -= amount;
        self.flicker = Some(FLICKER_TICKS);
        ctx.camera.shake(SHAKE_INTENSITY, SHAKE_TICKS);
        ctx.emit_event(GameEvent::new(
            EVENT_HEALTH_CHANGED,
            previous as f32,
            self.health as f32,
            MAX_HEALTH as f32,
        ));
        log::debug!("player {:?} took {} damage, health {}", owner, amount, self.health);
    }

    fn check_for_damage(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        let enemies = ctx.of_kind(EntityKind::Enemy);
        let touching = ctx.touches(owner, &enemies);
        for _ in touching.iter() {
            self.take_damage(owner, CONTACT_DAMAGE, ctx);
        }
    }

    /// Blink slowly for the first half of the flicker, faster for the second.
    fn process_flicker(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        let Some(remaining) = self.flicker.as_mut() else {
            return;
        };
        *remaining -= 1;
        let remaining = *remaining;

        let alpha = if remaining < 0 {
            self.flicker = None;
            1.0
        } else {
            let period = if remaining > FLICKER_TICKS / 2 { 5 } else { 3 };
            if (remaining / period) % 2 == 0 {
                0.5
            } else {
                1.0
            }
        };

        if let Some(sprite) = ctx.registry.get_mut(owner).and_then(|e| e.sprite.as_mut()) {
            sprite.alpha = alpha;
        }
    }

    fn shoot(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        if self.shoot_cooldown >= 0 {
            return;
        }
        let Some(pos) = ctx.registry.get(owner).map(|e| e.pos) else {
            return;
        };
        let dir = Vec2::new(self.facing, if self.facing_up { -1.0 } else { 0.0 });
        if let Err(err) = bullet::spawn_bullet(ctx, pos, dir * BULLET_SPEED, self.bullet_targets) {
            log::warn!("player: bullet rejected: {}", err);
        }
        self.shoot_cooldown = SHOOT_COOLDOWN;
    }
}

impl Behavior for Player {
    fn update(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        if self.flicker.is_none() {
            self.check_for_damage(owner, ctx);
        } else {
            self.process_flicker(owner, ctx);
        }

        let input = ctx.input;
        if input.is_held(Control::Left) {
            self.facing = -1.0;
            ctx.move_by(owner, -SPEED, 0.0);
        }
        if input.is_held(Control::Right) {
            self.facing = 1.0;
            ctx.move_by(owner, SPEED, 0.0);
        }
        self.facing_up = input.is_held(Control::Up);

        if input.is_held(Control::Shoot) {
            self.shoot(owner, ctx);
        }
        // Anything below zero means ready; clamp so idle ticks never wrap.
        self.shoot_cooldown = (self.shoot_cooldown - 1).max(-1);

        let (touching_top, touching_bottom) = ctx
            .physics(owner)
            .map_or((false, false), |p| (p.touching_top, p.touching_bottom));

        if touching_bottom {
            self.jumping = false;
            self.vy = self.vy.min(0.0);
        }

        if !self.jumping {
            if touching_bottom && input.is_held(Control::Jump) {
                self.vy = -JUMP_VELOCITY;
                self.jumping = true;
            }
        } else {
            // Releasing jump early cuts the jump short.
            if !input.is_held(Control::Jump) && self.vy < 0.0 {
                self.vy = 0.0;
            }
            if touching_top && self.vy < 0.0 {
                self.vy = 0.0;
            }
        }

        // Gravity keeps pressing a grounded player into the floor, so
        // touching_bottom stays set while standing.
        self.vy = (self.vy + GRAVITY).min(MAX_FALL_SPEED);

        ctx.move_by(owner, 0.0, self.vy);
    }
}

/// Spawn the player colliding with `walls`; its bullets stop at `bullet_targets`.
pub fn spawn_player(
    ctx: &mut EngineContext,
    pos: Vec2,
    walls: GroupId,
    bullet_targets: GroupId,
) -> EngineResult<EntityId> {
    let id = ctx.next_id();
    let entity = Entity::new(id)
        .with_kind(EntityKind::Player)
        .with_pos(pos)
        .with_size(SIZE)
        .with_sprite(SpriteComponent::new(0.0, 0.0).with_atlas(SPRITE_ATLAS))
        .with_behavior(Player::new(bullet_targets))
        .with_capability(FollowWithCamera);
    ctx.spawn_with_physics(
        entity,
        PhysicsDesc::solid().with_immovable(true).colliding_with(walls),
    )
}
