//! Raycast-based AABB collision resolver.
//!
//! Each tick the resolver consumes every registered body's accumulated
//! displacement and moves it one axis at a time. On each axis a fan of
//! parallel probe rays is cast from just inside the leading edge; the nearest
//! obstruction along the direction of travel clamps the move.
//!
//! There is no broad phase: every probe scans its target group linearly.
//! Bodies never push each other; a body is only ever stopped by members of
//! its own `collides_with` group.

use glam::Vec2;

use crate::api::error::ConfigError;
use crate::api::types::EntityId;
use crate::core::geometry::{Aabb, Axis, Ray};
use crate::core::group::{Group, Groups};
use crate::core::physics::PhysicsConfig;
use crate::core::registry::Registry;

/// Nearest intersection reported by [`raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: EntityId,
    pub point: Vec2,
}

/// Outcome of moving a body along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMove {
    /// New coordinate of the body's minimum corner on the moved axis.
    pub position: f32,
    /// The entity that stopped the move, if any.
    pub hit: Option<EntityId>,
}

/// Cast `ray` against every member of `against`; the nearest entry point wins.
///
/// Members whose box already contains the ray's start are skipped, so a body
/// resting against (or overlapping) a collider does not keep hitting it.
/// A missing target group never hits.
pub fn raycast(ray: &Ray, against: Option<&Group>, registry: &Registry) -> Option<RaycastHit> {
    let against = against?;
    let mut best: Option<(f32, RaycastHit)> = None;

    for id in against.iter() {
        let Some(bounds) = registry.bounds(id) else {
            continue;
        };
        if bounds.contains_point(ray.start) {
            continue;
        }
        if let Some(point) = bounds.ray_entry(ray) {
            let dist = ray.start.distance(point);
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, RaycastHit { entity: id, point }));
            }
        }
    }

    best.map(|(_, hit)| hit)
}

/// Every member of `group` whose box overlaps the box of `id`.
///
/// Plain overlap test: no rays, no skin, no solidity check. The entity
/// itself is never reported.
pub fn touches(registry: &Registry, id: EntityId, group: &Group) -> Group {
    let Some(bounds) = registry.bounds(id) else {
        return Group::new();
    };
    group
        .iter()
        .filter(|&other| other != id)
        .filter(|&other| {
            registry
                .bounds(other)
                .map_or(false, |b| bounds.overlaps(&b))
        })
        .collect()
}

/// Owns the set of physics-enabled entities and resolves their movement.
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    config: PhysicsConfig,
    /// Registration order is the only ordering used during resolution.
    members: Vec<EntityId>,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            config: PhysicsConfig::default(),
            members: Vec::new(),
        }
    }
}

impl CollisionResolver {
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            members: Vec::new(),
        })
    }

    /// Swap in new probe settings. Registered bodies are kept, so each of
    /// them must still leave room for the probes under the new skin width.
    pub fn set_config(&mut self, config: PhysicsConfig, registry: &Registry) -> Result<(), ConfigError> {
        config.validate()?;
        for &id in &self.members {
            if let Some(physics) = registry.get(id).and_then(|e| e.physics.as_ref()) {
                config.validate_extent(physics.effective_size)?;
            }
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn register(&mut self, id: EntityId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    pub fn deregister(&mut self, id: EntityId) {
        self.members.retain(|&m| m != id);
    }

    pub fn is_registered(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    /// Registered entities, in registration order.
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Run the full per-tick algorithm: flag reset, resolution, clear.
    pub fn step(&self, registry: &mut Registry, groups: &Groups) {
        self.reset_flags(registry);
        self.resolve_all(registry, groups);
        self.clear_requests(registry);
    }

    /// Flag reset pass.
    pub fn reset_flags(&self, registry: &mut Registry) {
        for &id in &self.members {
            if let Some(physics) = registry.get_mut(id).and_then(|e| e.physics.as_mut()) {
                physics.reset_flags();
            }
        }
    }

    /// Resolution pass. Bodies are resolved one after another in registration
    /// order, so a body resolved later sees earlier bodies at their new spot.
    pub fn resolve_all(&self, registry: &mut Registry, groups: &Groups) {
        for &id in &self.members {
            self.resolve_one(id, registry, groups);
        }
    }

    /// Clear pass.
    pub fn clear_requests(&self, registry: &mut Registry) {
        for &id in &self.members {
            if let Some(physics) = registry.get_mut(id).and_then(|e| e.physics.as_mut()) {
                physics.reset();
            }
        }
    }

    fn resolve_one(&self, id: EntityId, registry: &mut Registry, groups: &Groups) {
        let Some(entity) = registry.get(id) else {
            return;
        };
        let Some(physics) = entity.physics.as_ref() else {
            return;
        };

        let (dx, dy) = (physics.dx(), physics.dy());
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        // Both axes lay out their probes from the pre-move box.
        let origin = entity.bounds();
        let targets = physics.collides_with.and_then(|g| groups.get(g));

        let x_move = (dx != 0.0).then(|| self.move_axis(Axis::X, &origin, dx, targets, registry));
        let y_move = (dy != 0.0).then(|| self.move_axis(Axis::Y, &origin, dy, targets, registry));

        let Some(entity) = registry.get_mut(id) else {
            return;
        };
        let Some(physics) = entity.physics.as_mut() else {
            return;
        };

        if let Some(m) = x_move {
            entity.pos.x = m.position;
            if let Some(hit) = m.hit {
                physics.touching_left = dx < 0.0;
                physics.touching_right = dx > 0.0;
                physics.record_hit(hit);
                log::trace!("resolver: {:?} blocked on x by {:?}", id, hit);
            }
        }

        if let Some(m) = y_move {
            entity.pos.y = m.position;
            if let Some(hit) = m.hit {
                physics.touching_top = dy < 0.0;
                physics.touching_bottom = dy > 0.0;
                physics.record_hit(hit);
                log::trace!("resolver: {:?} blocked on y by {:?}", id, hit);
            }
        }
    }

    /// Move a box by `d` along `axis`, stopping at the nearest obstruction.
    pub fn move_axis(
        &self,
        axis: Axis,
        bounds: &Aabb,
        d: f32,
        targets: Option<&Group>,
        registry: &Registry,
    ) -> AxisMove {
        let a = axis.index();
        let b = axis.cross().index();
        let skin = self.config.skin_width;
        let rays = self.config.ray_count;

        let size = bounds.size();
        let forward = d > 0.0;
        let sign = if forward { 1.0 } else { -1.0 };

        let unobstructed = AxisMove {
            position: bounds.min[a] + d,
            hit: None,
        };
        if targets.map_or(true, Group::is_empty) {
            return unobstructed;
        }

        let leading_edge = bounds.min[a] + if forward { size[a] } else { 0.0 };
        let ray_start = leading_edge - sign * skin;
        let ray_end = ray_start + sign * skin + d;
        let spacing = (size[b] - skin * 2.0) / (rays - 1) as f32;

        // (distance along travel, hit coordinate on the axis, struck entity)
        let mut nearest: Option<(f32, f32, EntityId)> = None;

        for i in 0..rays {
            let across = bounds.min[b] + skin + spacing * i as f32;
            let ray = Ray::along(axis, ray_start, ray_end, across);

            if let Some(hit) = raycast(&ray, targets, registry) {
                let coord = hit.point[a];
                let dist = (coord - leading_edge) * sign;
                if nearest.map_or(true, |(best, _, _)| dist < best) {
                    nearest = Some((dist, coord, hit.entity));
                }
            }
        }

        match nearest {
            None => unobstructed,
            Some((_, coord, entity)) => AxisMove {
                position: coord - if forward { size[a] } else { 0.0 },
                hit: Some(entity),
            },
        }
    }
}
