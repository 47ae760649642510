//! The result graph accumulator

use crate::store::{Entity, EntityId};
use indexmap::IndexMap;

/// Deduplicating, insertion-ordered collection of discovered entities.
///
/// Uniqueness is by entity identity (concrete type name + key). An
/// entity reachable via several paths or several source entities
/// keeps its first-seen position.
#[derive(Debug, Default)]
pub struct EntityGraph<'a> {
    entities: IndexMap<EntityId, &'a Entity>,
}

impl<'a> EntityGraph<'a> {
    pub fn new() -> Self {
        EntityGraph {
            entities: IndexMap::new(),
        }
    }

    /// Add entities, skipping any already present
    pub fn add<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        for entity in entities {
            self.entities.entry(entity.id()).or_insert(entity);
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Current contents in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &'a Entity> + '_ {
        self.entities.values().copied()
    }

    /// Snapshot of the current contents
    pub fn to_vec(&self) -> Vec<&'a Entity> {
        self.iter().collect()
    }

    pub fn into_vec(self) -> Vec<&'a Entity> {
        self.entities.into_values().collect()
    }
}
