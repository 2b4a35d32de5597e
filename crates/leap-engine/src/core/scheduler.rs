//! Per-tick phase ordering.
//!
//! One tick is `pre-update -> update -> resolve -> post-update -> reap`.
//! Nothing leaves the registry before the reap phase, so every phase before
//! it can iterate the live entities without guarding against removal.

use crate::api::game::{EngineContext, Game, Hook};
use crate::api::types::EntityId;

/// Where the scheduler currently is within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPhase {
    #[default]
    Idle,
    PreUpdate,
    Update,
    Resolve,
    PostUpdate,
    Reap,
}

/// Drives ticks over an [`EngineContext`].
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    ticks: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one full tick.
    pub fn tick<G: Game + ?Sized>(&mut self, game: &mut G, ctx: &mut EngineContext) {
        ctx.set_phase(TickPhase::PreUpdate);
        for id in live_ids(ctx) {
            ctx.run_capabilities(id, Hook::PreUpdate);
        }

        ctx.set_phase(TickPhase::Update);
        game.update(ctx);
        for id in live_ids(ctx) {
            ctx.run_behavior(id, Hook::Update);
            ctx.run_capabilities(id, Hook::Update);
        }

        ctx.set_phase(TickPhase::Resolve);
        ctx.resolve_physics();

        // Entities marked for destruction are still live here.
        ctx.set_phase(TickPhase::PostUpdate);
        for id in live_ids(ctx) {
            ctx.run_behavior(id, Hook::PostUpdate);
            ctx.run_capabilities(id, Hook::PostUpdate);
        }

        ctx.set_phase(TickPhase::Reap);
        let reaped = ctx.reap();
        if reaped > 0 {
            log::debug!("tick {}: reaped {} entities", self.ticks, reaped);
        }

        ctx.end_tick();
        ctx.set_phase(TickPhase::Idle);
        self.ticks += 1;
    }
}

/// Snapshot of the registry at the start of a phase. Entities spawned during
/// the phase join from the next phase on.
fn live_ids(ctx: &EngineContext) -> Vec<EntityId> {
    ctx.registry.ids()
}
