use glam::Vec2;
use leap_engine::*;

use crate::game::{EVENT_ENEMY_HIT, SPRITE_ATLAS};

const SIZE: f32 = 4.0;
/// Bullets that hit nothing expire after this many ticks.
const LIFETIME: u32 = 90;

/// Flies in a straight line until it strikes something in its target group.
#[derive(Debug, Clone)]
pub struct Bullet {
    velocity: Vec2,
    ttl: u32,
}

impl Bullet {
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            ttl: LIFETIME,
        }
    }
}

impl Behavior for Bullet {
    fn update(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        if self.ttl == 0 {
            ctx.destroy(owner);
            return;
        }
        self.ttl -= 1;
        ctx.move_by(owner, self.velocity.x, self.velocity.y);
    }

    fn post_update(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        let Some(physics) = ctx.physics(owner) else {
            return;
        };
        let struck = physics.collided_with().all();
        if struck.is_empty() {
            return;
        }

        for id in struck {
            let is_enemy = ctx
                .registry
                .get(id)
                .map_or(false, |e| e.kind == EntityKind::Enemy);
            if is_enemy {
                ctx.emit_event(GameEvent::new(EVENT_ENEMY_HIT, id.0 as f32, 0.0, 0.0));
            }
        }
        ctx.destroy(owner);
    }
}

/// Fire a bullet from `pos` with `velocity`, stopping at members of `targets`.
pub fn spawn_bullet(
    ctx: &mut EngineContext,
    pos: Vec2,
    velocity: Vec2,
    targets: GroupId,
) -> EngineResult<EntityId> {
    let id = ctx.next_id();
    let entity = Entity::new(id)
        .with_kind(EntityKind::Bullet)
        .with_pos(pos)
        .with_size(Vec2::splat(SIZE))
        .with_sprite(SpriteComponent::new(0.0, 1.0).with_atlas(SPRITE_ATLAS))
        .with_behavior(Bullet::new(velocity));
    ctx.spawn_with_physics(
        entity,
        PhysicsDesc::solid().with_immovable(true).colliding_with(targets),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl Game for Idle {
        fn init(&mut self, _ctx: &mut EngineContext) {}
    }

    fn target(ctx: &mut EngineContext, group: GroupId, kind: EntityKind, x: f32) -> EntityId {
        let id = ctx.next_id();
        ctx.spawn(
            Entity::new(id)
                .with_kind(kind)
                .with_pos(Vec2::new(x, 0.0))
                .with_size(Vec2::new(16.0, 32.0)),
        );
        ctx.groups.get_mut(group).unwrap().add(id);
        id
    }

    #[test]
    fn bullet_hitting_enemy_reports_and_disappears() {
        let mut ctx = EngineContext::new();
        let targets = ctx.groups.named("targets");
        let enemy = target(&mut ctx, targets, EntityKind::Enemy, 40.0);
        let bullet = spawn_bullet(&mut ctx, Vec2::new(0.0, 10.0), Vec2::new(8.0, 0.0), targets).unwrap();

        let mut scheduler = Scheduler::new();
        for _ in 0..5 {
            scheduler.tick(&mut Idle, &mut ctx);
        }

        assert!(!ctx.registry.contains(bullet));
        assert!(ctx.registry.contains(enemy));
        assert!(!ctx.resolver.is_registered(bullet));
    }

    #[test]
    fn hit_event_names_the_enemy() {
        let mut ctx = EngineContext::new();
        let targets = ctx.groups.named("targets");
        let enemy = target(&mut ctx, targets, EntityKind::Enemy, 10.0);
        spawn_bullet(&mut ctx, Vec2::new(0.0, 10.0), Vec2::new(8.0, 0.0), targets).unwrap();

        // Leading edge at 4 reaches the enemy face at 10 on the first tick.
        Scheduler::new().tick(&mut Idle, &mut ctx);

        let hits: Vec<_> = ctx.events().iter().filter(|e| e.kind == EVENT_ENEMY_HIT).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].a as u32, enemy.0);
    }

    #[test]
    fn walls_stop_bullets_without_hit_events() {
        let mut ctx = EngineContext::new();
        let targets = ctx.groups.named("targets");
        target(&mut ctx, targets, EntityKind::Static, 10.0);
        let bullet = spawn_bullet(&mut ctx, Vec2::new(0.0, 10.0), Vec2::new(8.0, 0.0), targets).unwrap();

        Scheduler::new().tick(&mut Idle, &mut ctx);

        assert!(!ctx.registry.contains(bullet));
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn stray_bullets_expire() {
        let mut ctx = EngineContext::new();
        let targets = ctx.groups.named("targets");
        let bullet = spawn_bullet(&mut ctx, Vec2::ZERO, Vec2::new(8.0, 0.0), targets).unwrap();

        let mut scheduler = Scheduler::new();
        for _ in 0..LIFETIME {
            scheduler.tick(&mut Idle, &mut ctx);
        }
        assert!(ctx.registry.contains(bullet));

        scheduler.tick(&mut Idle, &mut ctx);
        assert!(!ctx.registry.contains(bullet));
    }
}
