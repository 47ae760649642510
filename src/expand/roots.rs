//! Root validation and type compatibility
//!
//! Every root must be a known, attached entity of this store, and all
//! roots must share a common type under single inheritance. The
//! common type is computed incrementally: it narrows to an ancestor
//! of the running type when the new root derives from one, or widens
//! to an ancestor of the new root's type when the running type does.

use super::{ExpandError, ExpandResult};
use crate::metadata::{EntityType, MetadataRegistry};
use crate::store::{Entity, EntityStore};

fn root_err(index: usize, reason: impl Into<String>) -> ExpandError {
    ExpandError::RootValidation {
        index,
        reason: reason.into(),
    }
}

/// Validate roots and compute the narrowest common ancestor type.
///
/// `roots` must be non-empty; path resolution needs one authoritative
/// type to start from.
pub(crate) fn resolve_root_type<'a>(
    store: &EntityStore,
    registry: &'a MetadataRegistry,
    roots: &[&Entity],
) -> ExpandResult<&'a EntityType> {
    let mut root_type: Option<&EntityType> = None;

    for (index, root) in roots.iter().enumerate() {
        let this_type = match registry.get(root.type_name()) {
            Some(entity_type) => entity_type,
            None => return Err(root_err(index, "is not a known entity type")),
        };
        if root.state().is_detached() {
            return Err(root_err(index, "is a detached entity"));
        }
        if root.store_id() != Some(store.id()) {
            return Err(root_err(index, "has a different store than other roots"));
        }

        root_type = Some(match root_type {
            None => this_type,
            Some(current) => merge_root_type(registry, current, this_type)
                .ok_or_else(|| root_err(index, "is not type-compatible with other roots"))?,
        });
    }

    root_type.ok_or_else(|| root_err(0, "is missing"))
}

// Closest common base type of two root types, if any.
fn merge_root_type<'a>(
    registry: &'a MetadataRegistry,
    current: &'a EntityType,
    this_type: &'a EntityType,
) -> Option<&'a EntityType> {
    if current.name() == this_type.name() {
        return Some(current);
    }
    // Does the new type derive from the current root type or one of
    // its bases? If so the root type narrows to that ancestor.
    for base in registry.base_chain(current) {
        if registry.is_subtype(this_type.name(), base.name()) {
            return Some(base);
        }
    }
    // Does the current root type derive from the new type or one of
    // its bases? If so the root type widens to that ancestor.
    for base in registry.base_chain(this_type) {
        if registry.is_subtype(current.name(), base.name()) {
            return Some(base);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{EntityType, TypeName};
    use crate::store::EntityStore;

    fn hierarchy() -> MetadataRegistry {
        MetadataRegistry::builder()
            .entity_type(EntityType::new("Document"))
            .entity_type(EntityType::new("Order").with_base("Document"))
            .entity_type(EntityType::new("InternationalOrder").with_base("Order"))
            .entity_type(EntityType::new("Invoice").with_base("Document"))
            .entity_type(EntityType::new("Product"))
            .build()
            .unwrap()
    }

    fn store_with(registry_types: &[(&str, i64)]) -> EntityStore {
        let mut store = EntityStore::new();
        for &(type_name, key) in registry_types {
            store.attach(Entity::new(type_name, key)).unwrap();
        }
        store
    }

    #[test]
    fn test_single_root() {
        let registry = hierarchy();
        let store = store_with(&[("Order", 1)]);
        let root = store.entity(&crate::store::EntityId::new("Order", 1i64)).unwrap();

        let root_type = resolve_root_type(&store, &registry, &[root]).unwrap();
        assert_eq!(root_type.name(), &TypeName::new("Order"));
    }

    #[test]
    fn test_mixed_roots_narrow_to_ancestor() {
        let registry = hierarchy();
        let store = store_with(&[("Order", 1), ("InternationalOrder", 2)]);
        let order = store.entity(&crate::store::EntityId::new("Order", 1i64)).unwrap();
        let international = store
            .entity(&crate::store::EntityId::new("InternationalOrder", 2i64))
            .unwrap();

        // Subtype second: root type stays the ancestor.
        let root_type = resolve_root_type(&store, &registry, &[order, international]).unwrap();
        assert_eq!(root_type.name(), &TypeName::new("Order"));

        // Subtype first: root type widens to the ancestor.
        let root_type = resolve_root_type(&store, &registry, &[international, order]).unwrap();
        assert_eq!(root_type.name(), &TypeName::new("Order"));
    }

    #[test]
    fn test_siblings_meet_at_shared_base() {
        let registry = hierarchy();
        let store = store_with(&[("Order", 1), ("Invoice", 2)]);
        let order = store.entity(&crate::store::EntityId::new("Order", 1i64)).unwrap();
        let invoice = store.entity(&crate::store::EntityId::new("Invoice", 2i64)).unwrap();

        let root_type = resolve_root_type(&store, &registry, &[order, invoice]).unwrap();
        assert_eq!(root_type.name(), &TypeName::new("Document"));
    }

    #[test]
    fn test_unrelated_roots_rejected() {
        let registry = hierarchy();
        let store = store_with(&[("Order", 1), ("Product", 5)]);
        let order = store.entity(&crate::store::EntityId::new("Order", 1i64)).unwrap();
        let product = store.entity(&crate::store::EntityId::new("Product", 5i64)).unwrap();

        let err = resolve_root_type(&store, &registry, &[order, product]).unwrap_err();
        assert_eq!(
            err,
            ExpandError::RootValidation {
                index: 1,
                reason: "is not type-compatible with other roots".to_string(),
            }
        );
    }

    #[test]
    fn test_detached_root_rejected() {
        let registry = hierarchy();
        let store = store_with(&[]);
        let detached = Entity::new("Order", 1i64);

        let err = resolve_root_type(&store, &registry, &[&detached]).unwrap_err();
        assert_eq!(
            err,
            ExpandError::RootValidation {
                index: 0,
                reason: "is a detached entity".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let registry = hierarchy();
        let mut store = EntityStore::new();
        store.attach(Entity::new("Mystery", 1i64)).unwrap();
        let root = store.entity(&crate::store::EntityId::new("Mystery", 1i64)).unwrap();

        let err = resolve_root_type(&store, &registry, &[root]).unwrap_err();
        assert_eq!(
            err,
            ExpandError::RootValidation {
                index: 0,
                reason: "is not a known entity type".to_string(),
            }
        );
    }

    #[test]
    fn test_root_from_other_store_rejected() {
        let registry = hierarchy();
        let store = store_with(&[("Order", 1)]);
        let other = store_with(&[("Order", 2)]);
        let ours = store.entity(&crate::store::EntityId::new("Order", 1i64)).unwrap();
        let theirs = other.entity(&crate::store::EntityId::new("Order", 2i64)).unwrap();

        let err = resolve_root_type(&store, &registry, &[ours, theirs]).unwrap_err();
        assert_eq!(
            err,
            ExpandError::RootValidation {
                index: 1,
                reason: "has a different store than other roots".to_string(),
            }
        );
    }
}
