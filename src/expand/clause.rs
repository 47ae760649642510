//! Accepted shapes of the roots and expand arguments
//!
//! Both arguments are tagged unions resolved by an explicit
//! discriminator, never by inspecting an arbitrary value.

use crate::store::Entity;
use serde::{Deserialize, Serialize};

/// An already-parsed expand clause: the ordered property paths a
/// traversal will follow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandClause {
    property_paths: Vec<String>,
}

impl ExpandClause {
    pub fn new(property_paths: Vec<String>) -> Self {
        ExpandClause { property_paths }
    }

    pub fn property_paths(&self) -> &[String] {
        &self.property_paths
    }

    pub fn into_property_paths(self) -> Vec<String> {
        self.property_paths
    }
}

/// The expand argument of a graph expansion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Expand {
    /// No expansion: the graph is just the deduplicated roots
    #[default]
    NoExpand,
    /// An expand string in path grammar, e.g. `"Orders.OrderDetails, Employee"`
    Path(String),
    /// Pre-split dot-separated paths, used as-is
    PathList(Vec<String>),
    /// An already-parsed expand clause
    Clause(ExpandClause),
}

impl From<&str> for Expand {
    fn from(s: &str) -> Self {
        Expand::Path(s.to_string())
    }
}

impl From<String> for Expand {
    fn from(s: String) -> Self {
        Expand::Path(s)
    }
}

impl From<Vec<String>> for Expand {
    fn from(paths: Vec<String>) -> Self {
        Expand::PathList(paths)
    }
}

impl From<Vec<&str>> for Expand {
    fn from(paths: Vec<&str>) -> Self {
        Expand::PathList(paths.into_iter().map(str::to_string).collect())
    }
}

impl From<ExpandClause> for Expand {
    fn from(clause: ExpandClause) -> Self {
        Expand::Clause(clause)
    }
}

/// Result of a previously-executed local query: the matched entities
/// plus the expansion the query itself declared.
///
/// Passing one as roots without an explicit expand argument reuses
/// the declared clause.
#[derive(Debug, Clone)]
pub struct LocalQueryResult<'a> {
    entities: Vec<&'a Entity>,
    expand: Option<ExpandClause>,
}

impl<'a> LocalQueryResult<'a> {
    pub fn new(entities: Vec<&'a Entity>) -> Self {
        LocalQueryResult {
            entities,
            expand: None,
        }
    }

    pub fn with_expand(mut self, clause: ExpandClause) -> Self {
        self.expand = Some(clause);
        self
    }

    pub fn entities(&self) -> &[&'a Entity] {
        &self.entities
    }

    pub fn expand(&self) -> Option<&ExpandClause> {
        self.expand.as_ref()
    }
}

/// The roots argument of a graph expansion
#[derive(Debug, Clone)]
pub enum Roots<'a> {
    /// A single root entity
    One(&'a Entity),
    /// A sequence of root entities
    Many(Vec<&'a Entity>),
    /// A locally-executed query result set
    ResultSet(&'a LocalQueryResult<'a>),
}

impl<'a> From<&'a Entity> for Roots<'a> {
    fn from(entity: &'a Entity) -> Self {
        Roots::One(entity)
    }
}

impl<'a> From<Vec<&'a Entity>> for Roots<'a> {
    fn from(entities: Vec<&'a Entity>) -> Self {
        Roots::Many(entities)
    }
}

impl<'a> From<&'a [&'a Entity]> for Roots<'a> {
    fn from(entities: &'a [&'a Entity]) -> Self {
        Roots::Many(entities.to_vec())
    }
}

impl<'a> From<&'a LocalQueryResult<'a>> for Roots<'a> {
    fn from(result: &'a LocalQueryResult<'a>) -> Self {
        Roots::ResultSet(result)
    }
}
