//! Registry of entity type descriptors
//!
//! The registry is the single authority navigation resolution runs
//! against: type lookup by name, base-chain walks, "self and
//! subtypes" sets, and navigation lookup with inheritance. It is
//! built once, validated, and read-only afterwards.

use super::entity_type::EntityType;
use super::navigation::NavigationProperty;
use super::types::TypeName;
use indexmap::IndexMap;
use thiserror::Error;

/// Errors raised while building or querying a registry
#[derive(Error, Debug, PartialEq)]
pub enum MetadataError {
    #[error("Entity type {0} is already registered")]
    DuplicateType(TypeName),

    #[error("Entity type {0} is not registered")]
    UnknownType(TypeName),

    #[error("Base type {base} of {name} is not registered")]
    UnknownBaseType { name: TypeName, base: TypeName },

    #[error("Base type chain of {0} contains a cycle")]
    BaseCycle(TypeName),

    #[error("Navigation '{navigation}' of {name} targets unregistered type {target}")]
    UnknownTargetType {
        name: TypeName,
        navigation: String,
        target: TypeName,
    },

    #[error("Navigation '{navigation}' of {name} names unknown inverse '{inverse}' on {target}")]
    UnknownInverse {
        name: TypeName,
        navigation: String,
        target: TypeName,
        inverse: String,
    },
}

pub type MetadataResult<T> = Result<T, MetadataError>;

/// Builder collecting entity types before validation
#[derive(Debug, Default)]
pub struct MetadataRegistryBuilder {
    types: Vec<EntityType>,
}

impl MetadataRegistryBuilder {
    pub fn entity_type(mut self, entity_type: EntityType) -> Self {
        self.types.push(entity_type);
        self
    }

    /// Validate all cross-references and produce an immutable registry
    pub fn build(self) -> MetadataResult<MetadataRegistry> {
        let mut types = IndexMap::new();
        for entity_type in self.types {
            let name = entity_type.name().clone();
            if types.insert(name.clone(), entity_type).is_some() {
                return Err(MetadataError::DuplicateType(name));
            }
        }
        let registry = MetadataRegistry { types };
        registry.validate()?;
        Ok(registry)
    }
}

/// Validated, immutable collection of entity type descriptors
#[derive(Debug, Clone)]
pub struct MetadataRegistry {
    types: IndexMap<TypeName, EntityType>,
}

impl MetadataRegistry {
    pub fn builder() -> MetadataRegistryBuilder {
        MetadataRegistryBuilder::default()
    }

    pub fn get(&self, name: &TypeName) -> Option<&EntityType> {
        self.types.get(name)
    }

    /// Lookup that surfaces a typed error instead of an `Option`
    pub fn require(&self, name: &TypeName) -> MetadataResult<&EntityType> {
        self.get(name)
            .ok_or_else(|| MetadataError::UnknownType(name.clone()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Walk from a type upward through its base types, starting with
    /// the type itself
    pub fn base_chain<'a>(&'a self, entity_type: &'a EntityType) -> impl Iterator<Item = &'a EntityType> {
        std::iter::successors(Some(entity_type), move |current| {
            current.base().and_then(|base| self.get(base))
        })
    }

    /// Whether `name` equals `ancestor` or inherits from it
    pub fn is_subtype(&self, name: &TypeName, ancestor: &TypeName) -> bool {
        match self.get(name) {
            Some(entity_type) => self
                .base_chain(entity_type)
                .any(|current| current.name() == ancestor),
            None => false,
        }
    }

    /// All registered types equal to or inheriting from `name`, the
    /// type itself first, subtypes in registration order.
    ///
    /// The order is what makes first-match lookups across subtype
    /// partitions deterministic.
    pub fn self_and_subtypes(&self, name: &TypeName) -> Vec<&EntityType> {
        let mut result = Vec::new();
        if let Some(entity_type) = self.get(name) {
            result.push(entity_type);
        }
        for entity_type in self.types.values() {
            if entity_type.name() != name && self.is_subtype(entity_type.name(), name) {
                result.push(entity_type);
            }
        }
        result
    }

    /// Resolve a navigation property on a type, searching the base
    /// chain so derived types see inherited navigations. The nearest
    /// declaration wins.
    pub fn navigation(&self, type_name: &TypeName, navigation: &str) -> Option<&NavigationProperty> {
        let entity_type = self.get(type_name)?;
        self.base_chain(entity_type)
            .find_map(|current| current.navigation(navigation))
    }

    fn validate(&self) -> MetadataResult<()> {
        // Base structure first: navigation checks below walk base
        // chains and must not meet a cycle.
        for entity_type in self.types.values() {
            if let Some(base) = entity_type.base() {
                if self.get(base).is_none() {
                    return Err(MetadataError::UnknownBaseType {
                        name: entity_type.name().clone(),
                        base: base.clone(),
                    });
                }
            }
            // A chain longer than the registry must revisit a type.
            if self.base_chain(entity_type).take(self.types.len() + 1).count() > self.types.len() {
                return Err(MetadataError::BaseCycle(entity_type.name().clone()));
            }
        }
        for entity_type in self.types.values() {
            for navigation in entity_type.navigations() {
                let target = navigation.target();
                if self.get(target).is_none() {
                    return Err(MetadataError::UnknownTargetType {
                        name: entity_type.name().clone(),
                        navigation: navigation.name().to_string(),
                        target: target.clone(),
                    });
                }
                if let Some(inverse) = navigation.inverse() {
                    if self.navigation(target, inverse).is_none() {
                        return Err(MetadataError::UnknownInverse {
                            name: entity_type.name().clone(),
                            navigation: navigation.name().to_string(),
                            target: target.clone(),
                            inverse: inverse.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
