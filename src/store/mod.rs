//! In-memory entity store
//!
//! This module implements the cache side of graph expansion:
//! - Entities with typed fields and a lifecycle aspect
//! - Per-concrete-type partitions with a key -> entity index
//! - A store that owns attach/detach and hands out read access

pub mod entity;
pub mod group;
pub mod store;
pub mod value;

// Re-export main types
pub use entity::{Entity, EntityId, EntityState};
pub use group::EntityGroup;
pub use store::{EntityStore, StoreError, StoreId, StoreResult};
pub use value::{KeyValue, Value};
