use std::collections::{HashMap, HashSet};

use crate::api::types::EntityId;

/// Unordered, identity-keyed set of entity references.
///
/// Groups never own entities; they only hold ids. Used for level geometry
/// ("walls"), for collision targets, and as the result of registry queries.
/// No iteration order is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    members: HashSet<EntityId>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from any number of existing id sequences.
    /// Duplicates across the sequences collapse into one membership.
    pub fn from_sequences<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = EntityId>,
    {
        let mut group = Self::new();
        for seq in sequences {
            group.extend(seq);
        }
        group
    }

    /// Insert a member. Adding an existing member is a no-op.
    pub fn add(&mut self, id: EntityId) {
        self.members.insert(id);
    }

    /// Remove a member. Removing a non-member is a no-op.
    pub fn remove(&mut self, id: EntityId) {
        self.members.remove(&id);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    /// Snapshot of the current members, in no particular order.
    pub fn all(&self) -> Vec<EntityId> {
        self.members.iter().copied().collect()
    }

    /// Borrowing iterator over members, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().copied()
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }
}

impl Extend<EntityId> for Group {
    fn extend<T: IntoIterator<Item = EntityId>>(&mut self, iter: T) {
        self.members.extend(iter);
    }
}

impl FromIterator<EntityId> for Group {
    fn from_iter<T: IntoIterator<Item = EntityId>>(iter: T) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// Handle to a long-lived group stored in [`Groups`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u32);

/// Registry of named, long-lived groups.
///
/// Physics states refer to their collision target by [`GroupId`], so a group
/// can be created empty at startup and filled once the level has loaded.
#[derive(Debug, Default)]
pub struct Groups {
    groups: Vec<Group>,
    names: HashMap<String, GroupId>,
}

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an anonymous group.
    pub fn create(&mut self) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(Group::new());
        id
    }

    /// Get the group registered under `name`, creating it if needed.
    pub fn named(&mut self, name: &str) -> GroupId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.create();
        self.names.insert(name.to_string(), id);
        id
    }

    /// Look up a named group without creating it.
    pub fn find(&self, name: &str) -> Option<GroupId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.0 as usize)
    }

    /// Drop an entity from every registered group.
    pub fn remove_everywhere(&mut self, id: EntityId) {
        for group in &mut self.groups {
            group.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_group_is_empty() {
        let g = Group::new();
        assert_eq!(g.size(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn add_is_idempotent() {
        let mut g = Group::new();
        g.add(EntityId(7));
        g.add(EntityId(7));
        assert_eq!(g.size(), 1);
        assert!(g.contains(EntityId(7)));
    }

    #[test]
    fn remove_member_and_non_member() {
        let mut g = Group::new();
        g.add(EntityId(7));
        g.remove(EntityId(7));
        assert_eq!(g.size(), 0);
        assert!(!g.contains(EntityId(7)));

        g.remove(EntityId(99));
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn seeded_from_several_sequences() {
        let walls = vec![EntityId(1), EntityId(2)];
        let enemies = vec![EntityId(2), EntityId(3)];
        let g = Group::from_sequences([walls, enemies]);
        assert_eq!(g.size(), 3);

        let mut all = g.all();
        all.sort();
        assert_eq!(all, vec![EntityId(1), EntityId(2), EntityId(3)]);
    }

    #[test]
    fn snapshot_does_not_track_later_mutation() {
        let mut g = Group::new();
        g.add(EntityId(1));
        let snapshot = g.all();
        g.add(EntityId(2));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn named_groups_are_reused() {
        let mut groups = Groups::new();
        let a = groups.named("Wall");
        let b = groups.named("Wall");
        assert_eq!(a, b);
        assert_eq!(groups.find("Wall"), Some(a));
        assert_eq!(groups.find("Enemies"), None);
    }

    #[test]
    fn remove_everywhere_clears_all_memberships() {
        let mut groups = Groups::new();
        let walls = groups.named("Wall");
        let hittable = groups.create();
        groups.get_mut(walls).unwrap().add(EntityId(4));
        groups.get_mut(hittable).unwrap().add(EntityId(4));

        groups.remove_everywhere(EntityId(4));

        assert!(!groups.get(walls).unwrap().contains(EntityId(4)));
        assert!(!groups.get(hittable).unwrap().contains(EntityId(4)));
    }
}
