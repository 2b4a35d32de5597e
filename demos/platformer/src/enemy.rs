use leap_engine::*;

use crate::game::{EVENT_ENEMY_HIT, EVENT_ENEMY_KILLED};

const SPEED: f32 = 3.0;
const MAX_HEALTH: i32 = 3;
/// Damage dealt to the player on contact.
pub const CONTACT_DAMAGE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Patrol {
    MovingLeft,
    MovingRight,
}

/// Walks back and forth, turning around whenever it bumps into a wall.
#[derive(Debug, Clone)]
pub struct Enemy {
    patrol: Patrol,
    health: i32,
}

impl Enemy {
    pub fn new() -> Self {
        Self {
            patrol: Patrol::MovingLeft,
            health: MAX_HEALTH,
        }
    }
}

impl Default for Enemy {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for Enemy {
    fn update(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        let hits = ctx
            .events()
            .iter()
            .filter(|e| e.kind == EVENT_ENEMY_HIT && e.a as u32 == owner.0)
            .count() as i32;
        if hits > 0 {
            self.health -= hits;
            if self.health <= 0 {
                ctx.emit_event(GameEvent::new(EVENT_ENEMY_KILLED, owner.0 as f32, 0.0, 0.0));
                ctx.destroy(owner);
                return;
            }
        }

        let Some(physics) = ctx.physics(owner) else {
            return;
        };
        let (blocked_left, blocked_right) = (physics.touching_left, physics.touching_right);

        match self.patrol {
            Patrol::MovingLeft if blocked_left => self.patrol = Patrol::MovingRight,
            Patrol::MovingLeft => ctx.move_by(owner, -SPEED, 0.0),
            Patrol::MovingRight if blocked_right => self.patrol = Patrol::MovingLeft,
            Patrol::MovingRight => ctx.move_by(owner, SPEED, 0.0),
        }
    }
}

/// Layer spawner for the enemies layer: the tile becomes a patrolling enemy
/// drawn with the tile's own sprite.
pub fn spawn_enemy(ctx: &mut EngineContext, tile: TileSpawn<'_>, walls: GroupId) -> EngineResult<EntityId> {
    let id = ctx.next_id();
    let entity = tile
        .into_entity(id)
        .with_kind(EntityKind::Enemy)
        .with_behavior(Enemy::new());
    ctx.spawn_with_physics(
        entity,
        PhysicsDesc::solid().with_immovable(true).colliding_with(walls),
    )
}
