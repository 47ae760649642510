//! Navigation property descriptors
//!
//! A navigation property is one named association from a source
//! entity type to a target entity type. The side that stores the
//! foreign-key value is the forward (owning, to-one) side; the other
//! side is the inverse (collection) side and is reachable only by
//! scanning for matching foreign-key values.

use super::types::TypeName;
use serde::{Deserialize, Serialize};

/// Describes one named association from a source type to a target type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationProperty {
    name: String,
    target: TypeName,
    /// Foreign-key field names owned on the source side. Empty when
    /// this is the inverse ("many") side of the association.
    foreign_key_names: Vec<String>,
    /// Name of the inverse navigation property on the target type
    inverse: Option<String>,
    /// Foreign-key field names on the target side, for unidirectional
    /// associations where no inverse navigation is declared
    inverse_foreign_key_names: Vec<String>,
}

impl NavigationProperty {
    pub fn new(name: impl Into<String>, target: impl Into<TypeName>) -> Self {
        NavigationProperty {
            name: name.into(),
            target: target.into(),
            foreign_key_names: Vec::new(),
            inverse: None,
            inverse_foreign_key_names: Vec::new(),
        }
    }

    /// Declare a foreign-key field owned on the source side
    pub fn with_foreign_key(mut self, field: impl Into<String>) -> Self {
        self.foreign_key_names.push(field.into());
        self
    }

    /// Name the inverse navigation property on the target type
    pub fn with_inverse(mut self, navigation: impl Into<String>) -> Self {
        self.inverse = Some(navigation.into());
        self
    }

    /// Declare the target-side foreign-key field directly, for
    /// associations with no declared inverse navigation
    pub fn with_inverse_foreign_key(mut self, field: impl Into<String>) -> Self {
        self.inverse_foreign_key_names.push(field.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &TypeName {
        &self.target
    }

    pub fn foreign_key_names(&self) -> &[String] {
        &self.foreign_key_names
    }

    /// First owned foreign-key field, if this is the forward side
    pub fn foreign_key(&self) -> Option<&str> {
        self.foreign_key_names.first().map(String::as_str)
    }

    pub fn inverse(&self) -> Option<&str> {
        self.inverse.as_deref()
    }

    pub fn inverse_foreign_key_names(&self) -> &[String] {
        &self.inverse_foreign_key_names
    }

    /// First declared target-side foreign-key field
    pub fn inverse_foreign_key(&self) -> Option<&str> {
        self.inverse_foreign_key_names.first().map(String::as_str)
    }

    /// Whether the source side stores the foreign key (to-one)
    pub fn owns_foreign_key(&self) -> bool {
        !self.foreign_key_names.is_empty()
    }
}
