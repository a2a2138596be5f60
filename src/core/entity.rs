//! Simulation entity storage with simple integer IDs

use crate::HarnessError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Simple integer ID for simulation entities
///
/// IDs are handed out densely per store and never reused within a run, so a
/// replay's actor references stay stable for the whole simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub fn new(id: u32) -> Self {
        EntityId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Base trait for all simulation entities
pub trait SimEntity {
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
}

/// Central storage for one kind of simulation entity
///
/// Backed by a `BTreeMap` so iteration is always in ascending ID order. Tick
/// logic walks these stores every tick and must visit entities in the same
/// order on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<T> {
    entities: BTreeMap<EntityId, T>,
    next_id: u32,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore {
            entities: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Generate a new unique EntityId
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert an entity with a specific ID
    pub fn insert(&mut self, id: EntityId, entity: T) {
        self.entities.insert(id, entity);
    }

    /// Get an entity by ID
    pub fn get(&self, id: EntityId) -> Result<&T> {
        self.entities
            .get(&id)
            .ok_or(HarnessError::EntityNotFound(id.as_u32()))
    }

    /// Get a mutable reference to an entity
    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut T> {
        self.entities
            .get_mut(&id)
            .ok_or(HarnessError::EntityNotFound(id.as_u32()))
    }

    /// Remove an entity
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.entities.remove(&id)
    }

    /// Iterate over all entities in ascending ID order
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &T)> {
        self.entities.iter()
    }

    /// Iterate mutably over all entities in ascending ID order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&EntityId, &mut T)> {
        self.entities.iter_mut()
    }

    /// Snapshot of the current IDs, for loops that mutate other stores
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Get count of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestEntity {
        id: EntityId,
        name: String,
    }

    impl SimEntity for TestEntity {
        fn id(&self) -> EntityId {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_entity_store() {
        let mut store = EntityStore::new();
        let id1 = store.next_id();
        let id2 = store.next_id();

        assert_eq!(id1.as_u32(), 0);
        assert_eq!(id2.as_u32(), 1);

        store.insert(
            id1,
            TestEntity {
                id: id1,
                name: "Test1".to_string(),
            },
        );
        store.insert(
            id2,
            TestEntity {
                id: id2,
                name: "Test2".to_string(),
            },
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(id1).unwrap().name(), "Test1");
        assert_eq!(store.get(id2).unwrap().id(), id2);
        assert!(matches!(
            store.get(EntityId::new(999)),
            Err(HarnessError::EntityNotFound(999))
        ));
    }

    #[test]
    fn test_iteration_is_id_ordered() {
        let mut store = EntityStore::new();
        for name in ["c", "a", "b"] {
            let id = store.next_id();
            store.insert(
                id,
                TestEntity {
                    id,
                    name: name.to_string(),
                },
            );
        }
        // Remove and reinsert the first one; it must still come first
        let first = store.remove(EntityId::new(0)).unwrap();
        store.insert(EntityId::new(0), first);

        let ids: Vec<u32> = store.iter().map(|(id, _)| id.as_u32()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
