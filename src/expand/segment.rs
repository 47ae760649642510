//! Per-segment lookup resolution
//!
//! A resolved segment is a plain value object holding the candidate
//! entity groups and the key field it matches on. Forward (foreign-
//! key owning) segments do an indexed lookup per source entity;
//! reverse segments scan the candidate groups. The asymmetry is the
//! cost model of a cache with key indexes only.

use super::{ExpandError, ExpandResult};
use crate::metadata::{EntityType, MetadataRegistry};
use crate::store::{Entity, EntityGroup, EntityId, EntityStore};
use thiserror::Error;
use tracing::trace;

/// Error raised while evaluating a lookup for one specific entity
#[derive(Error, Debug, PartialEq)]
pub enum SegmentApplyError {
    #[error("entity {entity} has no field '{field}'")]
    MissingField { entity: EntityId, field: String },

    #[error("field '{field}' of {entity} holds a {found} value, which cannot be used as a key")]
    NonKeyField {
        entity: EntityId,
        field: String,
        found: &'static str,
    },
}

/// Resolved lookup for one path segment
#[derive(Debug)]
pub(crate) enum SegmentLookup<'a> {
    /// No cached entities of the target type or its subtypes exist;
    /// every application yields nothing
    Empty { target: &'a EntityType },
    /// The source owns the foreign key: indexed lookup, at most one
    /// related entity per source
    Forward {
        target: &'a EntityType,
        foreign_key: String,
        groups: Vec<&'a EntityGroup>,
    },
    /// The target owns the foreign key: scan candidate groups for
    /// entities whose foreign key equals the source's primary key
    Reverse {
        target: &'a EntityType,
        foreign_key: String,
        groups: Vec<&'a EntityGroup>,
    },
}

impl<'a> SegmentLookup<'a> {
    /// Resolve one navigation segment against a base type.
    ///
    /// `path` is the full expand path the segment belongs to, used
    /// only for error context.
    pub(crate) fn resolve(
        store: &'a EntityStore,
        registry: &'a MetadataRegistry,
        base_type: &'a EntityType,
        segment: &str,
        path: &str,
    ) -> ExpandResult<SegmentLookup<'a>> {
        let nav = registry.navigation(base_type.name(), segment).ok_or_else(|| {
            ExpandError::UnknownNavigationProperty {
                path: path.to_string(),
                base_type: base_type.name().clone(),
                segment: segment.to_string(),
            }
        })?;
        let target = registry.require(nav.target())?;

        // A navigation to a base type must search every concrete
        // subtype partition of the cache.
        let groups: Vec<&EntityGroup> = registry
            .self_and_subtypes(target.name())
            .into_iter()
            .filter_map(|subtype| store.group(subtype.name()))
            .filter(|group| !group.is_empty())
            .collect();
        trace!(
            "segment '{}' on {}: {} candidate group(s) for target {}",
            segment,
            base_type.name(),
            groups.len(),
            target.name()
        );

        if groups.is_empty() {
            // No related entities can possibly be in cache.
            return Ok(SegmentLookup::Empty { target });
        }

        if let Some(foreign_key) = nav.foreign_key() {
            return Ok(SegmentLookup::Forward {
                target,
                foreign_key: foreign_key.to_string(),
                groups,
            });
        }

        // Inverse side: the key lives on the target. A declared
        // inverse navigation is authoritative; without one, fall back
        // to the unidirectional declaration on this side.
        let inverse_foreign_key = match nav.inverse() {
            Some(inverse) => registry
                .navigation(target.name(), inverse)
                .and_then(|inverse_nav| inverse_nav.foreign_key()),
            None => nav.inverse_foreign_key(),
        };
        match inverse_foreign_key {
            Some(foreign_key) => Ok(SegmentLookup::Reverse {
                target,
                foreign_key: foreign_key.to_string(),
                groups,
            }),
            None => Err(ExpandError::MissingKeyMetadata {
                base_type: base_type.name().clone(),
                segment: segment.to_string(),
            }),
        }
    }

    /// The type this segment resolves to, for chaining
    pub(crate) fn target_type(&self) -> &'a EntityType {
        match self {
            SegmentLookup::Empty { target }
            | SegmentLookup::Forward { target, .. }
            | SegmentLookup::Reverse { target, .. } => *target,
        }
    }

    /// Related entities for one source entity
    pub(crate) fn apply(&self, entity: &Entity) -> Result<Vec<&'a Entity>, SegmentApplyError> {
        match self {
            SegmentLookup::Empty { .. } => Ok(Vec::new()),

            SegmentLookup::Forward {
                foreign_key,
                groups,
                ..
            } => {
                let value =
                    entity
                        .field(foreign_key)
                        .ok_or_else(|| SegmentApplyError::MissingField {
                            entity: entity.id(),
                            field: foreign_key.clone(),
                        })?;
                if value.is_null() {
                    // Unset foreign key: no related entity.
                    return Ok(Vec::new());
                }
                let key = value.as_key().ok_or_else(|| SegmentApplyError::NonKeyField {
                    entity: entity.id(),
                    field: foreign_key.clone(),
                    found: value.type_name(),
                })?;
                // First indexed hit across candidate groups wins.
                Ok(groups
                    .iter()
                    .find_map(|&group| group.by_key(&key))
                    .into_iter()
                    .collect())
            }

            SegmentLookup::Reverse {
                foreign_key,
                groups,
                ..
            } => {
                let key = entity.key();
                let mut related = Vec::new();
                for &group in groups {
                    related.extend(group.entities().filter(|candidate| {
                        candidate
                            .field(foreign_key)
                            .map_or(false, |value| value.matches_key(key))
                    }));
                }
                Ok(related)
            }
        }
    }
}
