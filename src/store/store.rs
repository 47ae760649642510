//! In-memory entity store
//!
//! The store partitions cached entities by concrete type and owns
//! their lifecycle. Graph expansion only ever reads it.

use super::entity::{Entity, EntityId};
use super::group::EntityGroup;
use crate::metadata::TypeName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a store instance
///
/// Entities remember the store they are attached to by id, which is
/// how mixing roots from different stores is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct StoreId(u64);

impl Default for StoreId {
    fn default() -> Self {
        StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreId({})", self.0)
    }
}

/// Errors that can occur during store operations
#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Entity {0} already exists")]
    EntityAlreadyExists(EntityId),

    #[error("Entity {0} is attached to a different store")]
    AttachedToOtherStore(EntityId),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed, typed, in-memory collection of previously loaded entities
#[derive(Debug, Default)]
pub struct EntityStore {
    id: StoreId,
    groups: IndexMap<TypeName, EntityGroup>,
}

impl EntityStore {
    /// Create a new empty store with a fresh id
    pub fn new() -> Self {
        EntityStore {
            id: StoreId::default(),
            groups: IndexMap::new(),
        }
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Attach an entity to this store.
    ///
    /// The entity's state becomes `Unchanged` and its aspect records
    /// this store's id. Fails if the entity is attached elsewhere or
    /// an entity with the same identity is already cached.
    pub fn attach(&mut self, mut entity: Entity) -> StoreResult<EntityId> {
        if let Some(owner) = entity.store_id() {
            if owner != self.id {
                return Err(StoreError::AttachedToOtherStore(entity.id()));
            }
        }
        entity.mark_attached(self.id);
        let id = entity.id();
        let group = self
            .groups
            .entry(entity.type_name().clone())
            .or_insert_with(|| EntityGroup::new(entity.type_name().clone()));
        group.insert(entity)?;
        Ok(id)
    }

    /// Detach an entity, returning it with state `Detached`
    pub fn detach(&mut self, id: &EntityId) -> Option<Entity> {
        let group = self.groups.get_mut(id.type_name())?;
        let mut entity = group.remove(id.key())?;
        entity.mark_detached();
        Some(entity)
    }

    /// Look up one cached entity by identity
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.groups.get(id.type_name())?.by_key(id.key())
    }

    /// The partition for one concrete type, if any entity of that
    /// type was ever attached
    pub fn group(&self, type_name: &TypeName) -> Option<&EntityGroup> {
        self.groups.get(type_name)
    }

    /// All partitions, in first-attach order
    pub fn groups(&self) -> impl Iterator<Item = &EntityGroup> {
        self.groups.values()
    }

    /// Total number of cached entities
    pub fn len(&self) -> usize {
        self.groups.values().map(EntityGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(EntityGroup::is_empty)
    }
}
