//! Graph expansion over the entity store
//!
//! Expands a set of root entities into a deduplicated reachability
//! graph by following navigation paths against the cache, without
//! fetching anything: only entities already in the store appear. The
//! whole operation is a synchronous, read-only computation.

pub mod clause;
pub mod graph;
pub mod parser;
mod roots;
mod segment;
mod traversal;

// Re-export main types
pub use clause::{Expand, ExpandClause, LocalQueryResult, Roots};
pub use graph::EntityGraph;
pub use parser::{parse_expand, ParseError, ParseResult};
pub use segment::SegmentApplyError;

use crate::metadata::{MetadataError, MetadataRegistry, TypeName};
use crate::store::{Entity, EntityStore};
use thiserror::Error;
use tracing::debug;
use traversal::PathTraversal;

/// Errors raised by graph expansion.
///
/// All of these are caller-facing validation or metadata errors;
/// none is retryable, and any of them aborts the whole call without
/// a partial graph.
#[derive(Error, Debug, PartialEq)]
pub enum ExpandError {
    /// A root entity failed validation
    #[error("root[{index}] {reason}")]
    RootValidation { index: usize, reason: String },

    /// The expand string does not parse
    #[error("expand must be an expand string, a list of path strings, or a parsed expand clause")]
    ExpandFormat,

    /// A path segment names no navigation property on the type
    /// reached at that point
    #[error("cannot expand '{segment}' in path '{path}': not a navigation property of {base_type}")]
    UnknownNavigationProperty {
        path: String,
        base_type: TypeName,
        segment: String,
    },

    /// A navigation property exposes no foreign-key field on either side
    #[error("navigation '{segment}' of {base_type} has no foreign-key field on either side")]
    MissingKeyMetadata { base_type: TypeName, segment: String },

    /// Evaluating a segment for a specific entity failed
    #[error("can't expand '{segment}' for {base_type} in path '{path}': {source}")]
    Segment {
        path: String,
        base_type: TypeName,
        segment: String,
        #[source]
        source: SegmentApplyError,
    },

    /// A metadata lookup dangled (a validated registry makes this
    /// unreachable in practice; it propagates rather than panicking)
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

pub type ExpandResult<T> = Result<T, ExpandError>;

/// Expands root entities into their reachability graph.
///
/// The store and its type metadata are explicit collaborators; the
/// expander holds shared references and never mutates either.
#[derive(Debug, Clone, Copy)]
pub struct GraphExpander<'a> {
    store: &'a EntityStore,
    metadata: &'a MetadataRegistry,
}

impl<'a> GraphExpander<'a> {
    /// Create an expander over a store and its type metadata
    pub fn new(store: &'a EntityStore, metadata: &'a MetadataRegistry) -> Self {
        GraphExpander { store, metadata }
    }

    /// Compute the reachability graph of `roots` along `expand`.
    ///
    /// Returns the discovered entities in first-seen order, the
    /// deduplicated roots first. A [`LocalQueryResult`] root supplies
    /// its own declared expansion when `expand` is [`Expand::NoExpand`].
    pub fn entity_graph(
        &self,
        roots: impl Into<Roots<'a>>,
        expand: impl Into<Expand>,
    ) -> ExpandResult<Vec<&'a Entity>> {
        let mut expand = expand.into();
        let root_entities: Vec<&'a Entity> = match roots.into() {
            Roots::One(entity) => vec![entity],
            Roots::Many(entities) => entities,
            Roots::ResultSet(result) => {
                // A query result carries its own declared expansion;
                // an explicit argument overrides it.
                if expand == Expand::NoExpand {
                    if let Some(clause) = result.expand() {
                        expand = Expand::Clause(clause.clone());
                    }
                }
                result.entities().to_vec()
            }
        };

        let mut graph = EntityGraph::new();
        graph.add(root_entities); // removes duplicates
        let roots: Vec<&'a Entity> = graph.to_vec(); // deduplicated roots

        if !roots.is_empty() {
            let root_type = roots::resolve_root_type(self.store, self.metadata, &roots)?;
            let paths = normalize_expand(expand)?;
            debug!(
                "expanding {} root(s) of type {} along {} path(s)",
                roots.len(),
                root_type.name(),
                paths.len()
            );

            // Resolve every path before running any of them, so a bad
            // later path aborts before the graph grows.
            let mut traversals = Vec::with_capacity(paths.len());
            for path in &paths {
                traversals.push(PathTraversal::compile(
                    self.store,
                    self.metadata,
                    root_type,
                    path,
                )?);
            }
            for traversal in &traversals {
                traversal.run(&roots, &mut graph)?;
            }
        }

        Ok(graph.into_vec())
    }
}

// Normalize any accepted expand shape into dot-separated paths.
fn normalize_expand(expand: Expand) -> ExpandResult<Vec<String>> {
    match expand {
        Expand::NoExpand => Ok(Vec::new()),
        Expand::Path(text) => match parse_expand(&text) {
            Ok(clause) => Ok(clause.into_property_paths()),
            Err(err) => {
                debug!("expand string rejected: {}", err);
                Err(ExpandError::ExpandFormat)
            }
        },
        Expand::PathList(paths) => Ok(paths),
        Expand::Clause(clause) => Ok(clause.into_property_paths()),
    }
}
