use glam::Vec2;

use crate::api::game::EngineContext;
use crate::api::types::EntityId;
use crate::components::capability::Capability;

/// Keeps the camera centered on the owner.
///
/// Runs in post-update so the camera sees the owner's resolved position.
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowWithCamera;

impl Capability for FollowWithCamera {
    fn name(&self) -> &'static str {
        "follow_with_camera"
    }

    fn init(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        if let Some(center) = ctx.registry.get(owner).map(|e| e.center()) {
            ctx.camera.look_at(center);
        }
    }

    fn post_update(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        if let Some(center) = ctx.registry.get(owner).map(|e| e.center()) {
            ctx.camera.follow(center);
        }
    }
}

/// Pins the owner to a fixed offset from the camera's top-left corner (HUD).
#[derive(Debug, Clone, Copy)]
pub struct FixedToCamera {
    pub offset: Vec2,
}

impl FixedToCamera {
    pub fn new(offset: Vec2) -> Self {
        Self { offset }
    }

    fn pin(&self, owner: EntityId, ctx: &mut EngineContext) {
        let top_left = ctx.camera.top_left();
        if let Some(entity) = ctx.registry.get_mut(owner) {
            entity.pos = top_left + self.offset;
        }
    }
}

impl Capability for FixedToCamera {
    fn name(&self) -> &'static str {
        "fixed_to_camera"
    }

    fn init(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        self.pin(owner, ctx);
    }

    fn post_update(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        self.pin(owner, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::Game;
    use crate::components::entity::Entity;
    use crate::core::scheduler::Scheduler;

    struct NullGame;

    impl Game for NullGame {
        fn init(&mut self, _ctx: &mut EngineContext) {}
    }

    #[test]
    fn camera_follows_owner_center() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        ctx.spawn(
            Entity::new(id)
                .with_pos(Vec2::new(1000.0, 700.0))
                .with_size(Vec2::splat(20.0))
                .with_capability(FollowWithCamera),
        );
        assert_eq!(ctx.camera.center, Vec2::new(1010.0, 710.0));

        ctx.registry.get_mut(id).unwrap().pos = Vec2::new(1100.0, 700.0);
        Scheduler::new().tick(&mut NullGame, &mut ctx);
        assert_eq!(ctx.camera.center, Vec2::new(1110.0, 710.0));
    }

    #[test]
    fn hud_element_tracks_camera() {
        let mut ctx = EngineContext::new();
        let player = ctx.next_id();
        ctx.spawn(
            Entity::new(player)
                .with_pos(Vec2::new(2000.0, 300.0))
                .with_size(Vec2::splat(20.0))
                .with_capability(FollowWithCamera),
        );
        let hud = ctx.next_id();
        ctx.spawn(Entity::new(hud).with_capability(FixedToCamera::new(Vec2::new(10.0, 10.0))));

        Scheduler::new().tick(&mut NullGame, &mut ctx);

        let expected = ctx.camera.top_left() + Vec2::new(10.0, 10.0);
        assert_eq!(ctx.registry.get(hud).unwrap().pos, expected);
    }
}
