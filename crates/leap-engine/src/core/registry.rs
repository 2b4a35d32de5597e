use std::collections::BTreeMap;

use crate::api::types::{EntityId, EntityKind};
use crate::components::entity::Entity;
use crate::core::geometry::Aabb;
use crate::core::group::Group;

/// Central owner of every entity.
///
/// Entities are keyed by their id; since ids are handed out monotonically,
/// iteration order is spawn order. Everything else in the engine refers to
/// entities by [`EntityId`] only.
#[derive(Default)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity. An entity already stored under the same id is replaced.
    pub fn insert(&mut self, entity: Entity) {
        if let Some(old) = self.entities.insert(entity.id, entity) {
            log::warn!("registry: entity {:?} replaced an existing entry", old.id);
        }
    }

    /// Detach an entity. Returns it if it was present.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Iterate over all entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Snapshot of the current ids, in spawn order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Collision/overlap box of an entity.
    pub fn bounds(&self, id: EntityId) -> Option<Aabb> {
        self.get(id).map(Entity::bounds)
    }

    /// All entities of the given kind.
    pub fn of_kind(&self, kind: EntityKind) -> Group {
        self.matching(|e| e.kind == kind)
    }

    /// All entities carrying the given tag.
    pub fn with_tag(&self, tag: &str) -> Group {
        self.matching(|e| e.tag == tag)
    }

    /// All entities accepted by `pred`.
    pub fn matching(&self, mut pred: impl FnMut(&Entity) -> bool) -> Group {
        self.entities
            .values()
            .filter(|e| pred(e))
            .map(|e| e.id)
            .collect()
    }

    /// First entity with the given tag, in spawn order.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
