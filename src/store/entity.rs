//! Entity records held by the entity store
//!
//! An entity is a plain record: a concrete type name, a primary key
//! value, a field map (foreign keys included), and a lifecycle aspect
//! tracking its state and owning store.

use super::store::StoreId;
use super::value::{KeyValue, Value};
use crate::metadata::TypeName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a cached entity
///
/// The expansion core only distinguishes `Detached` from the rest;
/// the remaining states exist so callers can model a full change
/// tracker on top of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Unchanged,
    Added,
    Modified,
    Deleted,
    Detached,
}

impl EntityState {
    pub fn is_detached(&self) -> bool {
        matches!(self, EntityState::Detached)
    }
}

/// Identity of a cached entity: concrete type name plus key value.
///
/// Two entities are the same entity exactly when their ids are equal,
/// which is what graph deduplication runs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    type_name: TypeName,
    key: KeyValue,
}

impl EntityId {
    pub fn new(type_name: impl Into<TypeName>, key: impl Into<KeyValue>) -> Self {
        EntityId {
            type_name: type_name.into(),
            key: key.into(),
        }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn key(&self) -> &KeyValue {
        &self.key
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name, self.key)
    }
}

/// Lifecycle metadata attached to every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityAspect {
    state: EntityState,
    store: Option<StoreId>,
}

/// A record in the entity store
#[derive(Debug, Clone)]
pub struct Entity {
    type_name: TypeName,
    key: KeyValue,
    fields: IndexMap<String, Value>,
    aspect: EntityAspect,
}

impl Entity {
    /// Create a new detached entity with no fields
    pub fn new(type_name: impl Into<TypeName>, key: impl Into<KeyValue>) -> Self {
        Entity {
            type_name: type_name.into(),
            key: key.into(),
            fields: IndexMap::new(),
            aspect: EntityAspect {
                state: EntityState::Detached,
                store: None,
            },
        }
    }

    /// Builder-style field assignment for fixture construction
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field value, returning the previous one
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get a field value
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check if a field exists
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn key(&self) -> &KeyValue {
        &self.key
    }

    /// Identity of this entity (concrete type name + key)
    pub fn id(&self) -> EntityId {
        EntityId {
            type_name: self.type_name.clone(),
            key: self.key.clone(),
        }
    }

    pub fn state(&self) -> EntityState {
        self.aspect.state
    }

    /// Set the lifecycle state. `Detached` is managed by the store's
    /// attach/detach operations; setting it by hand on an attached
    /// entity leaves the store's bookkeeping untouched.
    pub fn set_state(&mut self, state: EntityState) {
        self.aspect.state = state;
    }

    /// Id of the store this entity is attached to, if any
    pub fn store_id(&self) -> Option<StoreId> {
        self.aspect.store
    }

    pub(crate) fn mark_attached(&mut self, store: StoreId) {
        self.aspect.state = EntityState::Unchanged;
        self.aspect.store = Some(store);
    }

    pub(crate) fn mark_detached(&mut self) {
        self.aspect.state = EntityState::Detached;
        self.aspect.store = None;
    }

    /// Get number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.key == other.key
    }
}

impl Eq for Entity {}

impl std::hash::Hash for Entity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.key.hash(state);
    }
}
