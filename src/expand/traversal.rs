//! Traversal of one expand path
//!
//! A path compiles into one lookup per segment, each resolved against
//! the type reached by the previous one. Execution feeds the
//! deduplicated output of one segment into the next as the frontier.

use super::graph::EntityGraph;
use super::segment::SegmentLookup;
use super::{ExpandError, ExpandResult};
use crate::metadata::{EntityType, MetadataRegistry};
use crate::store::{Entity, EntityStore};
use tracing::trace;

#[derive(Debug)]
struct CompiledSegment<'a> {
    name: String,
    base: &'a EntityType,
    lookup: SegmentLookup<'a>,
}

/// A compiled expand path, ready to run against a root frontier
#[derive(Debug)]
pub(crate) struct PathTraversal<'a> {
    path: String,
    segments: Vec<CompiledSegment<'a>>,
}

impl<'a> PathTraversal<'a> {
    /// Resolve every segment of a dot-separated path, threading each
    /// segment's target type into the next segment's resolution
    pub(crate) fn compile(
        store: &'a EntityStore,
        registry: &'a MetadataRegistry,
        root_type: &'a EntityType,
        path: &str,
    ) -> ExpandResult<Self> {
        let mut segments = Vec::new();
        let mut current = root_type;
        for segment in path.split('.') {
            let lookup = SegmentLookup::resolve(store, registry, current, segment, path)?;
            let next = lookup.target_type();
            segments.push(CompiledSegment {
                name: segment.to_string(),
                base: current,
                lookup,
            });
            current = next;
        }
        Ok(PathTraversal {
            path: path.to_string(),
            segments,
        })
    }

    /// Walk the path from the root frontier, accumulating every
    /// discovered entity into `graph`
    pub(crate) fn run(
        &self,
        roots: &[&'a Entity],
        graph: &mut EntityGraph<'a>,
    ) -> ExpandResult<()> {
        let mut frontier: Vec<&'a Entity> = roots.to_vec();

        for (position, segment) in self.segments.iter().enumerate() {
            if frontier.is_empty() {
                return Ok(()); // nothing left to explore
            }

            // Related entities of the whole frontier, concatenated.
            let mut related: Vec<&'a Entity> = Vec::new();
            for &entity in &frontier {
                let found = segment.lookup.apply(entity).map_err(|source| {
                    ExpandError::Segment {
                        path: self.path.clone(),
                        base_type: segment.base.name().clone(),
                        segment: segment.name.clone(),
                        source,
                    }
                })?;
                related.extend(found);
            }
            trace!(
                "path '{}' segment '{}': {} related entities from a frontier of {}",
                self.path,
                segment.name,
                related.len(),
                frontier.len()
            );

            graph.add(related.iter().copied());
            if position + 1 == self.segments.len() {
                return Ok(()); // no more segments
            }

            // The next frontier is this segment's output, deduplicated.
            let mut next = EntityGraph::new();
            next.add(related);
            frontier = next.into_vec();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{EntityType as Type, NavigationProperty, TypeName};
    use crate::store::EntityId;

    fn registry() -> MetadataRegistry {
        MetadataRegistry::builder()
            .entity_type(
                Type::new("Customer").with_navigation(
                    NavigationProperty::new("Orders", "Order").with_inverse("Customer"),
                ),
            )
            .entity_type(
                Type::new("Order")
                    .with_navigation(
                        NavigationProperty::new("Customer", "Customer")
                            .with_foreign_key("customerId")
                            .with_inverse("Orders"),
                    )
                    .with_navigation(
                        NavigationProperty::new("OrderDetails", "OrderDetail")
                            .with_inverse("Order"),
                    ),
            )
            .entity_type(
                Type::new("OrderDetail").with_navigation(
                    NavigationProperty::new("Order", "Order")
                        .with_foreign_key("orderId")
                        .with_inverse("OrderDetails"),
                ),
            )
            .build()
            .unwrap()
    }

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        store.attach(Entity::new("Customer", 1i64)).unwrap();
        store
            .attach(Entity::new("Order", 10i64).with_field("customerId", 1i64))
            .unwrap();
        store
            .attach(Entity::new("Order", 11i64).with_field("customerId", 1i64))
            .unwrap();
        store
            .attach(Entity::new("OrderDetail", 100i64).with_field("orderId", 10i64))
            .unwrap();
        store
    }

    #[test]
    fn test_two_segment_path() {
        let registry = registry();
        let store = store();
        let customer_type = registry.get(&TypeName::new("Customer")).unwrap();
        let root = store.entity(&EntityId::new("Customer", 1i64)).unwrap();

        let traversal =
            PathTraversal::compile(&store, &registry, customer_type, "Orders.OrderDetails")
                .unwrap();
        let mut graph = EntityGraph::new();
        graph.add([root]);
        traversal.run(&[root], &mut graph).unwrap();

        let ids: Vec<_> = graph.iter().map(|e| format!("{}", e.id())).collect();
        assert_eq!(
            ids,
            vec!["Customer(1)", "Order(10)", "Order(11)", "OrderDetail(100)"]
        );
    }

    #[test]
    fn test_compile_fails_on_unknown_middle_segment() {
        let registry = registry();
        let store = store();
        let customer_type = registry.get(&TypeName::new("Customer")).unwrap();

        let err = PathTraversal::compile(&store, &registry, customer_type, "Orders.Nope.Customer")
            .unwrap_err();
        assert_eq!(
            err,
            ExpandError::UnknownNavigationProperty {
                path: "Orders.Nope.Customer".to_string(),
                base_type: TypeName::new("Order"),
                segment: "Nope".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_frontier_short_circuits() {
        let registry = registry();
        let mut store = EntityStore::new();
        // A customer with no cached orders; OrderDetail group exists
        // but is unreachable once the first segment yields nothing.
        store.attach(Entity::new("Customer", 1i64)).unwrap();
        store
            .attach(Entity::new("Order", 99i64).with_field("customerId", 7i64))
            .unwrap();
        store
            .attach(Entity::new("OrderDetail", 100i64).with_field("orderId", 99i64))
            .unwrap();
        let customer_type = registry.get(&TypeName::new("Customer")).unwrap();
        let root = store.entity(&EntityId::new("Customer", 1i64)).unwrap();

        let traversal =
            PathTraversal::compile(&store, &registry, customer_type, "Orders.OrderDetails")
                .unwrap();
        let mut graph = EntityGraph::new();
        graph.add([root]);
        traversal.run(&[root], &mut graph).unwrap();

        assert_eq!(graph.len(), 1); // just the root
    }
}
