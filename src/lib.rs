//! Entity Graph
//!
//! In-memory entity graph expansion over a typed, cached entity
//! store: given root entities already loaded into a local cache,
//! compute every additional cached entity reachable through declared
//! navigation (relationship) paths, deduplicated and in discovery
//! order. Nothing is fetched and nothing is mutated; the operation is
//! a pure, synchronous read of what is already cached.
//!
//! # Architecture
//!
//! - `store` — the entity cache: per-concrete-type partitions with a
//!   key index, entity lifecycle (attach/detach)
//! - `metadata` — type descriptors, navigation properties, and the
//!   validated registry path resolution runs against
//! - `expand` — the expansion core: expand-path grammar, root type
//!   compatibility, per-segment lookups (indexed forward, scanning
//!   reverse), path traversal, and the result graph accumulator
//!
//! # Example Usage
//!
//! ```rust
//! use entity_graph::expand::GraphExpander;
//! use entity_graph::metadata::{EntityType, MetadataRegistry, NavigationProperty};
//! use entity_graph::store::{Entity, EntityStore};
//!
//! // Declare the type model: Customer 1 -> n Order.
//! let registry = MetadataRegistry::builder()
//!     .entity_type(EntityType::new("Customer").with_navigation(
//!         NavigationProperty::new("Orders", "Order").with_inverse("Customer"),
//!     ))
//!     .entity_type(EntityType::new("Order").with_navigation(
//!         NavigationProperty::new("Customer", "Customer")
//!             .with_foreign_key("customerId")
//!             .with_inverse("Orders"),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! // Cache some previously loaded entities.
//! let mut store = EntityStore::new();
//! let customer = store.attach(Entity::new("Customer", 1i64)).unwrap();
//! store
//!     .attach(Entity::new("Order", 10i64).with_field("customerId", 1i64))
//!     .unwrap();
//!
//! // Expand the customer along its Orders navigation.
//! let expander = GraphExpander::new(&store, &registry);
//! let root = store.entity(&customer).unwrap();
//! let graph = expander.entity_graph(root, "Orders").unwrap();
//!
//! assert_eq!(graph.len(), 2); // the customer, then its order
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod expand;
pub mod metadata;
pub mod store;

// Re-export main types for convenience
pub use expand::{
    parse_expand, EntityGraph, Expand, ExpandClause, ExpandError, ExpandResult, GraphExpander,
    LocalQueryResult, Roots,
};

pub use metadata::{
    EntityType, MetadataError, MetadataRegistry, MetadataRegistryBuilder, MetadataResult,
    NavigationProperty, TypeName,
};

pub use store::{
    Entity, EntityGroup, EntityId, EntityState, EntityStore, KeyValue, StoreError, StoreId,
    StoreResult, Value,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
