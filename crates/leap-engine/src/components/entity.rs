use std::fmt;

use glam::Vec2;

use crate::api::types::{EntityId, EntityKind};
use crate::components::capability::{Behavior, Capability};
use crate::components::sprite::SpriteComponent;
use crate::core::geometry::Aabb;
use crate::core::physics::PhysicsState;

/// Fat Entity: a single struct with optional components.
/// Designed for simplicity and rapid prototyping over ECS purity.
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Classification for kind-based lookups.
    pub kind: EntityKind,
    /// Free-form tag, e.g. the level layer an entity was loaded from.
    pub tag: String,
    /// Whether the render snapshot includes this entity.
    pub visible: bool,
    /// Top-left corner in world space (Y down).
    pub pos: Vec2,
    /// Width and height in world units.
    pub size: Vec2,
    /// Sprite cell (optional: entities without sprites are invisible).
    pub sprite: Option<SpriteComponent>,
    /// Physics state, created by the physics capability on attach.
    pub physics: Option<PhysicsState>,
    pub(crate) capabilities: Vec<Box<dyn Capability>>,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            kind: EntityKind::Static,
            tag: String::new(),
            visible: true,
            pos: Vec2::ZERO,
            size: Vec2::ONE,
            sprite: None,
            physics: None,
            capabilities: Vec::new(),
            behavior: None,
        }
    }

    // -- Builder pattern --

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    /// Append a capability. Its `init` runs when the entity is spawned.
    pub fn with_capability(mut self, capability: impl Capability + 'static) -> Self {
        self.capabilities.push(Box::new(capability));
        self
    }

    /// Attach the entity's own per-tick logic.
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Box used for collision and overlap tests.
    /// Physics bodies use their effective size; everything else its full size.
    pub fn bounds(&self) -> Aabb {
        match &self.physics {
            Some(physics) => physics.bounds(self.pos),
            None => Aabb::from_pos_size(self.pos, self.size),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Names of the attached capabilities, in dispatch order.
    pub fn capability_names(&self) -> Vec<&'static str> {
        self.capabilities.iter().map(|c| c.name()).collect()
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.name() == name)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("tag", &self.tag)
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("physics", &self.physics)
            .field("capabilities", &self.capability_names())
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}
