//! Capability and behavior traits.
//!
//! A capability is a reusable unit of behavior attached to an entity
//! (physics, camera-follow, HUD pinning). Each entity holds an ordered list of
//! them; the scheduler calls every hook in list order.
//!
//! Hooks receive the owner's id and the whole [`EngineContext`]. While a hook
//! runs, the owner's own capability list is detached from the entity, so a
//! capability reaches its owner's data (position, physics) through
//! `ctx.registry` but never its sibling capabilities.

use crate::api::game::EngineContext;
use crate::api::types::EntityId;

/// Lifecycle interface shared by every capability.
pub trait Capability {
    /// Short identifier used in logs and lookups.
    fn name(&self) -> &'static str;

    /// Called once, when the owning entity is spawned.
    fn init(&mut self, _owner: EntityId, _ctx: &mut EngineContext) {}

    /// Pre-update phase, every tick.
    fn pre_update(&mut self, _owner: EntityId, _ctx: &mut EngineContext) {}

    /// Update phase, every tick, after the owner's own behavior.
    fn update(&mut self, _owner: EntityId, _ctx: &mut EngineContext) {}

    /// Post-update phase, every tick, after collision resolution.
    fn post_update(&mut self, _owner: EntityId, _ctx: &mut EngineContext) {}

    /// Called exactly once, during the reap phase. The owner has already been
    /// detached from the registry when this runs.
    fn destroy(&mut self, _owner: EntityId, _ctx: &mut EngineContext) {}
}

/// An entity's own gameplay logic (player controls, enemy AI).
///
/// Runs in the update phase before the entity's capabilities.
pub trait Behavior {
    fn update(&mut self, owner: EntityId, ctx: &mut EngineContext);

    /// Runs in the post-update phase before the entity's capabilities.
    fn post_update(&mut self, _owner: EntityId, _ctx: &mut EngineContext) {}
}
