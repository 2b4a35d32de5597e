use glam::Vec2;
use serde::Deserialize;

use crate::api::error::ConfigError;
use crate::api::game::EngineContext;
use crate::api::types::EntityId;
use crate::components::capability::Capability;
use crate::core::geometry::Aabb;
use crate::core::group::{Group, GroupId};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Probe configuration shared by every physics body.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Parallel probe rays cast per axis. Must be at least 2.
    pub ray_count: usize,
    /// Inset of the probes from the body's edges, in world units.
    pub skin_width: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ray_count: 3,
            skin_width: 1.0,
        }
    }
}

impl PhysicsConfig {
    /// Check the global probe settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ray_count < 2 {
            return Err(ConfigError::TooFewRays {
                count: self.ray_count,
            });
        }
        if !self.skin_width.is_finite() || self.skin_width < 0.0 {
            return Err(ConfigError::InvalidSkinWidth(self.skin_width));
        }
        Ok(())
    }

    /// Check that a body of `size` leaves room for the probes on both axes.
    pub fn validate_extent(&self, size: Vec2) -> Result<(), ConfigError> {
        for extent in [size.x, size.y] {
            if !extent.is_finite() || extent < self.skin_width * 2.0 {
                return Err(ConfigError::DegenerateProbeSpacing {
                    extent,
                    skin_width: self.skin_width,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Body description
// ---------------------------------------------------------------------------

/// Description of a physics body, supplied when an entity is spawned.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsDesc {
    pub solid: bool,
    pub immovable: bool,
    /// Physics width. Defaults to the entity's width.
    pub effective_width: Option<f32>,
    /// Physics height. Defaults to the entity's height.
    pub effective_height: Option<f32>,
    pub collides_with: Option<GroupId>,
}

impl PhysicsDesc {
    /// A solid body with no collision target yet.
    pub fn solid() -> Self {
        Self {
            solid: true,
            ..Default::default()
        }
    }

    pub fn with_immovable(mut self, immovable: bool) -> Self {
        self.immovable = immovable;
        self
    }

    pub fn with_effective_size(mut self, width: f32, height: f32) -> Self {
        self.effective_width = Some(width);
        self.effective_height = Some(height);
        self
    }

    pub fn colliding_with(mut self, group: GroupId) -> Self {
        self.collides_with = Some(group);
        self
    }

    /// The body size this description resolves to for an owner of `owner_size`.
    pub fn resolved_size(&self, owner_size: Vec2) -> Vec2 {
        Vec2::new(
            self.effective_width.unwrap_or(owner_size.x),
            self.effective_height.unwrap_or(owner_size.y),
        )
    }
}

// ---------------------------------------------------------------------------
// Per-entity state
// ---------------------------------------------------------------------------

/// Per-entity physics state.
///
/// Gameplay requests movement with [`move_by`](Self::move_by) during the update
/// phase; the resolver consumes the request once per tick, writes the touching
/// flags and `collided_with`, and zeroes the request.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsState {
    dx: f32,
    dy: f32,
    pub solid: bool,
    pub immovable: bool,
    /// Size of the physics box, anchored at the owner's position.
    pub effective_size: Vec2,
    pub touching_top: bool,
    pub touching_bottom: bool,
    pub touching_left: bool,
    pub touching_right: bool,
    /// Group this body's movement is tested against. `None` moves freely.
    pub collides_with: Option<GroupId>,
    collided_with: Group,
}

impl PhysicsState {
    pub fn new(desc: &PhysicsDesc, owner_size: Vec2) -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            solid: desc.solid,
            immovable: desc.immovable,
            effective_size: desc.resolved_size(owner_size),
            touching_top: false,
            touching_bottom: false,
            touching_left: false,
            touching_right: false,
            collides_with: desc.collides_with,
            collided_with: Group::new(),
        }
    }

    /// Accumulate a displacement request. Several calls in one tick sum.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.dx += dx;
        self.dy += dy;
    }

    /// Requested horizontal displacement for the current tick.
    pub fn dx(&self) -> f32 {
        self.dx
    }

    /// Requested vertical displacement for the current tick.
    pub fn dy(&self) -> f32 {
        self.dy
    }

    /// Entities struck during the last resolution.
    pub fn collided_with(&self) -> &Group {
        &self.collided_with
    }

    pub fn is_touching_any(&self) -> bool {
        self.touching_top || self.touching_bottom || self.touching_left || self.touching_right
    }

    /// Clear touching flags and the struck set. Runs before any body is resolved.
    pub fn reset_flags(&mut self) {
        self.touching_top = false;
        self.touching_bottom = false;
        self.touching_left = false;
        self.touching_right = false;
        self.collided_with.clear();
    }

    /// Zero the displacement request. Runs after every body is resolved.
    pub fn reset(&mut self) {
        self.dx = 0.0;
        self.dy = 0.0;
    }

    /// Physics box for an owner at `pos`.
    pub fn bounds(&self, pos: Vec2) -> Aabb {
        Aabb::from_pos_size(pos, self.effective_size)
    }

    pub(crate) fn record_hit(&mut self, id: EntityId) {
        self.collided_with.add(id);
    }

    /// Drop a reaped entity from the struck set.
    pub(crate) fn forget(&mut self, id: EntityId) {
        self.collided_with.remove(id);
    }
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Lifecycle half of the physics capability.
///
/// The state itself lives in the owner's `physics` slot so the resolver can
/// read it directly; this capability creates that state on attach and
/// registers/deregisters the owner with the resolver.
#[derive(Debug, Clone)]
pub struct PhysicsCapability {
    desc: PhysicsDesc,
}

impl PhysicsCapability {
    /// Only built by `EngineContext`, after the body's extent has been checked.
    pub(crate) fn new(desc: PhysicsDesc) -> Self {
        Self { desc }
    }
}

impl Capability for PhysicsCapability {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn init(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        let Some(entity) = ctx.registry.get_mut(owner) else {
            return;
        };
        let size = self.desc.resolved_size(entity.size);
        if let Err(err) = ctx.resolver.config().validate_extent(size) {
            log::error!("physics body for {:?} not registered: {}", owner, err);
            return;
        }
        entity.physics = Some(PhysicsState::new(&self.desc, entity.size));
        ctx.resolver.register(owner);
    }

    fn destroy(&mut self, owner: EntityId, ctx: &mut EngineContext) {
        ctx.resolver.deregister(owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_fewer_than_two_rays() {
        let config = PhysicsConfig {
            ray_count: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewRays { count: 1 }));
    }

    #[test]
    fn rejects_negative_skin_width() {
        let config = PhysicsConfig {
            skin_width: -0.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSkinWidth(_))));
    }

    #[test]
    fn rejects_bodies_thinner_than_the_skin() {
        let config = PhysicsConfig::default();
        assert!(config.validate_extent(Vec2::new(10.0, 10.0)).is_ok());
        assert!(config.validate_extent(Vec2::new(2.0, 2.0)).is_ok());
        assert!(matches!(
            config.validate_extent(Vec2::new(10.0, 1.5)),
            Err(ConfigError::DegenerateProbeSpacing { .. })
        ));
    }

    #[test]
    fn config_parses_from_json_with_defaults() {
        let config: PhysicsConfig = serde_json::from_str(r#"{ "ray_count": 5 }"#).unwrap();
        assert_eq!(config.ray_count, 5);
        assert_eq!(config.skin_width, 1.0);
    }

    #[test]
    fn move_by_accumulates() {
        let mut state = PhysicsState::new(&PhysicsDesc::solid(), Vec2::splat(10.0));
        state.move_by(3.0, 0.0);
        state.move_by(2.0, -1.0);
        assert_eq!(state.dx(), 5.0);
        assert_eq!(state.dy(), -1.0);

        state.reset();
        assert_eq!(state.dx(), 0.0);
        assert_eq!(state.dy(), 0.0);
    }

    #[test]
    fn effective_size_defaults_to_owner() {
        let state = PhysicsState::new(&PhysicsDesc::solid(), Vec2::new(16.0, 24.0));
        assert_eq!(state.effective_size, Vec2::new(16.0, 24.0));

        let desc = PhysicsDesc::solid().with_effective_size(8.0, 12.0);
        let state = PhysicsState::new(&desc, Vec2::new(16.0, 24.0));
        assert_eq!(state.effective_size, Vec2::new(8.0, 12.0));
    }

    #[test]
    fn reset_flags_clears_touching_and_hits() {
        let mut state = PhysicsState::new(&PhysicsDesc::solid(), Vec2::splat(10.0));
        state.touching_left = true;
        state.touching_bottom = true;
        state.record_hit(EntityId(3));

        state.reset_flags();

        assert!(!state.is_touching_any());
        assert!(state.collided_with().is_empty());
    }
}
