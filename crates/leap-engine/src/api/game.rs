use glam::Vec2;

use crate::api::error::{ConfigError, EngineError, EngineResult};
use crate::api::types::{EntityId, EntityKind, GameEvent};
use crate::components::capability::Capability;
use crate::components::entity::Entity;
use crate::core::collision::{self, CollisionResolver, RaycastHit};
use crate::core::events::EventQueue;
use crate::core::geometry::Ray;
use crate::core::group::{Group, GroupId, Groups};
use crate::core::loading::LoadTracker;
use crate::core::physics::{PhysicsCapability, PhysicsConfig, PhysicsDesc, PhysicsState};
use crate::core::registry::Registry;
use crate::core::scheduler::TickPhase;
use crate::input::state::InputState;
use crate::renderer::camera::Camera2D;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units. Also the camera's visible width.
    pub world_width: f32,
    /// World height in game units. Also the camera's visible height.
    pub world_height: f32,
    /// Maximum number of render instances (default: 512).
    pub max_instances: usize,
    /// Maximum number of game events per tick (default: 32).
    pub max_events: usize,
    /// Probe settings for the collision resolver.
    pub physics: PhysicsConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_instances: 512,
            max_events: 32,
            physics: PhysicsConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep(self.fixed_dt));
        }
        self.physics.validate()
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, start level loads.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Level JSON fetched by the host has arrived. The runner marks one load
    /// finished afterwards, whether or not this succeeds.
    fn level_loaded(&mut self, _ctx: &mut EngineContext, _json: &str) -> EngineResult<()> {
        Ok(())
    }

    /// Called once, when every load started in `init` has finished and
    /// before the first tick.
    fn loading_complete(&mut self, _ctx: &mut EngineContext) {}

    /// Game-wide logic. Runs at the start of the update phase, before any
    /// entity behavior.
    fn update(&mut self, _ctx: &mut EngineContext) {}
}

/// Hooks dispatched to every capability of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
    PreUpdate,
    Update,
    PostUpdate,
}

/// Session-wide state, passed explicitly to the game, entity behaviors and
/// capabilities.
pub struct EngineContext {
    pub registry: Registry,
    pub groups: Groups,
    pub resolver: CollisionResolver,
    /// Held controls, refreshed before each tick.
    pub input: InputState,
    pub camera: Camera2D,
    pub loading: LoadTracker,
    events: EventQueue,
    max_events: usize,
    pending_destroy: Vec<EntityId>,
    next_id: u32,
    phase: TickPhase,
}

impl EngineContext {
    /// A context with the default configuration.
    pub fn new() -> Self {
        let config = GameConfig::default();
        Self {
            registry: Registry::new(),
            groups: Groups::new(),
            resolver: CollisionResolver::default(),
            input: InputState::new(),
            camera: Camera2D::new(config.world_width, config.world_height),
            loading: LoadTracker::new(),
            events: EventQueue::new(),
            max_events: config.max_events,
            pending_destroy: Vec::new(),
            next_id: 1,
            phase: TickPhase::Idle,
        }
    }

    /// A context for `config`, rejecting invalid settings up front.
    pub fn from_config(config: &GameConfig) -> EngineResult<Self> {
        config.validate()?;
        let mut ctx = Self::new();
        ctx.resolver = CollisionResolver::new(config.physics)?;
        ctx.camera = Camera2D::new(config.world_width, config.world_height);
        ctx.max_events = config.max_events;
        Ok(ctx)
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Current scheduler phase. `Idle` outside a tick.
    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: TickPhase) {
        self.phase = phase;
    }

    // -- Lifecycle --

    /// Add an entity to the registry and run its capabilities' `init` hooks.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        // Ids built outside next_id() must not be handed out again.
        self.next_id = self.next_id.max(id.0 + 1);
        log::debug!("spawn {:?} ({:?}, tag '{}')", id, entity.kind, entity.tag);
        self.registry.insert(entity);
        self.init_capabilities(id);
        id
    }

    /// Spawn an entity with a physics body. The physics capability is placed
    /// first in the entity's capability list.
    pub fn spawn_with_physics(&mut self, mut entity: Entity, desc: PhysicsDesc) -> EngineResult<EntityId> {
        self.check_physics(entity.id, entity.size, &desc)?;
        entity
            .capabilities
            .insert(0, Box::new(PhysicsCapability::new(desc)));
        Ok(self.spawn(entity))
    }

    /// Give a live entity a physics body.
    pub fn attach_physics(&mut self, id: EntityId, desc: PhysicsDesc) -> EngineResult<()> {
        let size = self
            .registry
            .get(id)
            .map(|e| e.size)
            .ok_or(EngineError::UnknownEntity(id))?;
        if self.registry.get(id).map_or(false, |e| e.physics.is_some()) {
            log::warn!("{:?} already has a physics body", id);
            return Ok(());
        }
        self.check_physics(id, size, &desc)?;
        self.attach(id, PhysicsCapability::new(desc))
    }

    /// Swap the resolver's probe settings, checking every registered body.
    pub fn set_physics_config(&mut self, config: PhysicsConfig) -> EngineResult<()> {
        self.resolver.set_config(config, &self.registry)?;
        Ok(())
    }

    fn check_physics(&self, id: EntityId, owner_size: Vec2, desc: &PhysicsDesc) -> EngineResult<()> {
        let size = desc.resolved_size(owner_size);
        if let Err(err) = self.resolver.config().validate_extent(size) {
            log::warn!("rejected physics body for {:?}: {}", id, err);
            return Err(err.into());
        }
        if let Some(group) = desc.collides_with {
            if self.groups.get(group).is_none() {
                return Err(EngineError::UnknownGroup(group));
            }
        }
        Ok(())
    }

    /// Attach a capability to a live entity and run its `init` hook.
    pub fn attach(&mut self, id: EntityId, capability: impl Capability + 'static) -> EngineResult<()> {
        let entity = self
            .registry
            .get_mut(id)
            .ok_or(EngineError::UnknownEntity(id))?;
        let index = entity.capabilities.len();
        entity.capabilities.push(Box::new(capability));

        let mut caps = std::mem::take(&mut entity.capabilities);
        if let Some(cap) = caps.get_mut(index) {
            cap.init(id, self);
        }
        self.restore_capabilities(id, caps);
        Ok(())
    }

    /// Mark an entity for destruction. It stays in the registry, and keeps
    /// receiving hooks, until the reap phase of the current tick.
    pub fn destroy(&mut self, id: EntityId) {
        if !self.registry.contains(id) || self.pending_destroy.contains(&id) {
            return;
        }
        log::debug!("destroy {:?} requested during {:?}", id, self.phase);
        self.pending_destroy.push(id);
    }

    pub fn is_pending_destroy(&self, id: EntityId) -> bool {
        self.pending_destroy.contains(&id)
    }

    /// Detach every entity marked for destruction, run their `destroy` hooks,
    /// and drop them from all named groups. Returns how many were removed.
    pub(crate) fn reap(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_destroy);
        let mut reaped = 0;
        for id in pending {
            let Some(mut entity) = self.registry.remove(id) else {
                continue;
            };
            let mut caps = std::mem::take(&mut entity.capabilities);
            for cap in caps.iter_mut() {
                cap.destroy(id, self);
            }
            self.groups.remove_everywhere(id);
            for other in self.registry.iter_mut() {
                if let Some(physics) = other.physics.as_mut() {
                    physics.forget(id);
                }
            }
            log::debug!("reaped {:?}", id);
            reaped += 1;
        }
        reaped
    }

    // -- Hook dispatch --

    fn init_capabilities(&mut self, id: EntityId) {
        let Some(entity) = self.registry.get_mut(id) else {
            return;
        };
        let mut caps = std::mem::take(&mut entity.capabilities);
        for cap in caps.iter_mut() {
            cap.init(id, self);
        }
        self.restore_capabilities(id, caps);
    }

    /// Run `hook` on every capability of `id`, in list order.
    pub(crate) fn run_capabilities(&mut self, id: EntityId, hook: Hook) {
        let Some(entity) = self.registry.get_mut(id) else {
            return;
        };
        let mut caps = std::mem::take(&mut entity.capabilities);
        for cap in caps.iter_mut() {
            match hook {
                Hook::PreUpdate => cap.pre_update(id, self),
                Hook::Update => cap.update(id, self),
                Hook::PostUpdate => cap.post_update(id, self),
            }
        }
        self.restore_capabilities(id, caps);
    }

    /// Run the entity's own behavior for the update or post-update phase.
    pub(crate) fn run_behavior(&mut self, id: EntityId, hook: Hook) {
        let Some(mut behavior) = self.registry.get_mut(id).and_then(|e| e.behavior.take()) else {
            return;
        };
        match hook {
            Hook::Update => behavior.update(id, self),
            Hook::PostUpdate => behavior.post_update(id, self),
            Hook::PreUpdate => {}
        }
        if let Some(entity) = self.registry.get_mut(id) {
            // A behavior installed while this one ran wins.
            if entity.behavior.is_none() {
                entity.behavior = Some(behavior);
            }
        }
    }

    /// Put a detached capability list back, keeping any added meanwhile.
    fn restore_capabilities(&mut self, id: EntityId, caps: Vec<Box<dyn Capability>>) {
        if let Some(entity) = self.registry.get_mut(id) {
            let added = std::mem::replace(&mut entity.capabilities, caps);
            entity.capabilities.extend(added);
        }
    }

    // -- Physics --

    pub(crate) fn resolve_physics(&mut self) {
        self.resolver.step(&mut self.registry, &self.groups);
    }

    pub fn physics(&self, id: EntityId) -> Option<&PhysicsState> {
        self.registry.get(id).and_then(|e| e.physics.as_ref())
    }

    pub fn physics_mut(&mut self, id: EntityId) -> Option<&mut PhysicsState> {
        self.registry.get_mut(id).and_then(|e| e.physics.as_mut())
    }

    /// Request a displacement for this tick. Ignored for entities without
    /// physics.
    pub fn move_by(&mut self, id: EntityId, dx: f32, dy: f32) {
        match self.physics_mut(id) {
            Some(physics) => physics.move_by(dx, dy),
            None => log::warn!("move_by on {:?}, which has no physics body", id),
        }
    }

    /// Point a body at a new collision target.
    pub fn set_collides_with(&mut self, id: EntityId, group: GroupId) -> EngineResult<()> {
        if self.groups.get(group).is_none() {
            return Err(EngineError::UnknownGroup(group));
        }
        let physics = self.physics_mut(id).ok_or(EngineError::UnknownEntity(id))?;
        physics.collides_with = Some(group);
        Ok(())
    }

    /// Members of `group` whose boxes overlap `id`.
    pub fn touches(&self, id: EntityId, group: &Group) -> Group {
        collision::touches(&self.registry, id, group)
    }

    /// Members of the named group `group` whose boxes overlap `id`.
    pub fn touches_group(&self, id: EntityId, group: GroupId) -> Group {
        match self.groups.get(group) {
            Some(g) => collision::touches(&self.registry, id, g),
            None => Group::new(),
        }
    }

    /// Nearest member of `group` along the segment from `start` to `end`.
    pub fn raycast(&self, start: Vec2, end: Vec2, group: GroupId) -> Option<RaycastHit> {
        collision::raycast(&Ray::new(start, end), self.groups.get(group), &self.registry)
    }

    // -- Queries --

    pub fn of_kind(&self, kind: EntityKind) -> Group {
        self.registry.of_kind(kind)
    }

    /// First entity of `kind` in spawn order.
    pub fn first_of_kind(&self, kind: EntityKind) -> Option<EntityId> {
        self.registry.iter().find(|e| e.kind == kind).map(|e| e.id)
    }

    // -- Events --

    /// Emit a game event. Readers see it from the next tick on.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.pending().len() >= self.max_events {
            log::warn!("event queue full, dropping {:?}", event);
            return;
        }
        self.events.emit(event);
    }

    /// Events emitted during the previous tick.
    pub fn events(&self) -> &[GameEvent] {
        self.events.published()
    }

    /// Publish this tick's events and advance per-tick timers.
    pub(crate) fn end_tick(&mut self) {
        self.events.publish();
        self.camera.tick();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
