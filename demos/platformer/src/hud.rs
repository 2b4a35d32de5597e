use glam::Vec2;
use leap_engine::*;

use crate::game::{EVENT_HEALTH_CHANGED, SPRITE_ATLAS};

const BAR_OFFSET: Vec2 = Vec2::new(10.0, 10.0);
const BAR_WIDTH: f32 = 100.0;
const BAR_HEIGHT: f32 = 15.0;
/// Ticks the bar takes to slide to a new health value.
const TWEEN_TICKS: u32 = 60;

#[derive(Debug, Clone, Copy)]
struct WidthTween {
    from: f32,
    to: f32,
    elapsed: u32,
}

/// Green bar that shrinks toward the player's health after each hit.
#[derive(Debug, Clone, Default)]
pub struct HealthBar {
    tween: Option<WidthTween>,
}

impl HealthBar {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl Behavior for HealthBar {
    fn update(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        if let Some(event) = ctx
            .events()
            .iter()
            .rev()
            .find(|e| e.kind == EVENT_HEALTH_CHANGED && e.c > 0.0)
        {
            let (prev, new, max) = (event.a, event.b, event.c);
            self.tween = Some(WidthTween {
                from: (prev / max).clamp(0.0, 1.0) * BAR_WIDTH,
                to: (new / max).clamp(0.0, 1.0) * BAR_WIDTH,
                elapsed: 0,
            });
        }

        let Some(tween) = self.tween.as_mut() else {
            return;
        };
        tween.elapsed += 1;
        let width = if tween.elapsed >= TWEEN_TICKS {
            let to = tween.to;
            self.tween = None;
            to
        } else {
            lerp(tween.from, tween.to, tween.elapsed as f32 / TWEEN_TICKS as f32)
        };

        if let Some(entity) = ctx.registry.get_mut(owner) {
            entity.size.x = width;
        }
    }
}

/// Spawn the health bar: a red backing with the green fill drawn over it,
/// both pinned to the top-left of the view.
pub fn spawn_hud(ctx: &mut EngineContext, max_health: i32) -> (EntityId, EntityId) {
    log::debug!("hud: health bar for max health {}", max_health);
    let size = Vec2::new(BAR_WIDTH, BAR_HEIGHT);

    let backing = ctx.next_id();
    ctx.spawn(
        Entity::new(backing)
            .with_kind(EntityKind::Ui)
            .with_size(size)
            .with_sprite(SpriteComponent::new(1.0, 1.0).with_atlas(SPRITE_ATLAS))
            .with_capability(FixedToCamera::new(BAR_OFFSET)),
    );

    let fill = ctx.next_id();
    ctx.spawn(
        Entity::new(fill)
            .with_kind(EntityKind::Ui)
            .with_size(size)
            .with_sprite(SpriteComponent::new(2.0, 1.0).with_atlas(SPRITE_ATLAS))
            .with_behavior(HealthBar::new())
            .with_capability(FixedToCamera::new(BAR_OFFSET)),
    );

    (backing, fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl Game for Idle {
        fn init(&mut self, _ctx: &mut EngineContext) {}
    }

    fn width(ctx: &EngineContext, id: EntityId) -> f32 {
        ctx.registry.get(id).unwrap().size.x
    }

    #[test]
    fn bars_stay_pinned_to_the_view() {
        let mut ctx = EngineContext::new();
        let (backing, fill) = spawn_hud(&mut ctx, 10);

        ctx.camera.look_at(Vec2::new(900.0, 700.0));
        Scheduler::new().tick(&mut Idle, &mut ctx);

        let expected = ctx.camera.top_left() + BAR_OFFSET;
        assert_eq!(ctx.registry.get(backing).unwrap().pos, expected);
        assert_eq!(ctx.registry.get(fill).unwrap().pos, expected);
    }

    #[test]
    fn health_change_slides_the_fill() {
        let mut ctx = EngineContext::new();
        let (backing, fill) = spawn_hud(&mut ctx, 10);
        let mut scheduler = Scheduler::new();

        ctx.emit_event(GameEvent::new(EVENT_HEALTH_CHANGED, 10.0, 8.0, 10.0));
        scheduler.tick(&mut Idle, &mut ctx);
        assert_eq!(width(&ctx, fill), BAR_WIDTH);

        // The event is read here: first step of the slide.
        scheduler.tick(&mut Idle, &mut ctx);
        let w = width(&ctx, fill);
        assert!(w < BAR_WIDTH && w > 80.0, "w = {}", w);

        for _ in 1..TWEEN_TICKS {
            scheduler.tick(&mut Idle, &mut ctx);
        }
        assert!((width(&ctx, fill) - 80.0).abs() < 1e-4);
        assert_eq!(width(&ctx, backing), BAR_WIDTH);
    }

    #[test]
    fn zero_health_empties_the_bar() {
        let mut ctx = EngineContext::new();
        let (_, fill) = spawn_hud(&mut ctx, 10);
        let mut scheduler = Scheduler::new();

        ctx.emit_event(GameEvent::new(EVENT_HEALTH_CHANGED, 2.0, -1.0, 10.0));
        for _ in 0..=TWEEN_TICKS {
            scheduler.tick(&mut Idle, &mut ctx);
        }
        assert_eq!(width(&ctx, fill), 0.0);
    }
}
