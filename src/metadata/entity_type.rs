//! Entity type descriptors

use super::navigation::NavigationProperty;
use super::types::TypeName;
use serde::{Deserialize, Serialize};

/// Type descriptor: a name, an optional base type, and the navigation
/// properties declared on this type.
///
/// Types form a single-rooted hierarchy per family via `base`.
/// Descriptors are plain data and immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    name: TypeName,
    base: Option<TypeName>,
    navigations: Vec<NavigationProperty>,
}

impl EntityType {
    pub fn new(name: impl Into<TypeName>) -> Self {
        EntityType {
            name: name.into(),
            base: None,
            navigations: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeName>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_navigation(mut self, navigation: NavigationProperty) -> Self {
        self.navigations.push(navigation);
        self
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn base(&self) -> Option<&TypeName> {
        self.base.as_ref()
    }

    /// Navigation properties declared directly on this type
    pub fn navigations(&self) -> &[NavigationProperty] {
        &self.navigations
    }

    /// Look up a navigation declared directly on this type. Inherited
    /// navigations resolve through [`MetadataRegistry::navigation`].
    ///
    /// [`MetadataRegistry::navigation`]: super::registry::MetadataRegistry::navigation
    pub fn navigation(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigations.iter().find(|nav| nav.name() == name)
    }
}
