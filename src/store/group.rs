//! Per-type partitions of the entity store

use super::entity::Entity;
use super::store::StoreError;
use super::value::KeyValue;
use crate::metadata::TypeName;
use rustc_hash::FxHashMap;

/// All cached entities of one concrete type.
///
/// Entities are stored in attach order; a key -> offset index gives
/// O(1) primary-key lookup, which is what makes forward (foreign-key
/// owning) navigation cheap.
#[derive(Debug, Clone)]
pub struct EntityGroup {
    type_name: TypeName,
    entities: Vec<Entity>,
    index: FxHashMap<KeyValue, usize>,
}

impl EntityGroup {
    pub(crate) fn new(type_name: TypeName) -> Self {
        EntityGroup {
            type_name,
            entities: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Indexed lookup by primary key
    pub fn by_key(&self, key: &KeyValue) -> Option<&Entity> {
        self.index.get(key).map(|&pos| &self.entities[pos])
    }

    /// All entities of this exact type, in attach order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> Result<(), StoreError> {
        if self.index.contains_key(entity.key()) {
            return Err(StoreError::EntityAlreadyExists(entity.id()));
        }
        self.index.insert(entity.key().clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &KeyValue) -> Option<Entity> {
        let pos = self.index.remove(key)?;
        let entity = self.entities.swap_remove(pos);
        // The former tail entity (if any) now lives at `pos`.
        if let Some(moved) = self.entities.get(pos) {
            self.index.insert(moved.key().clone(), pos);
        }
        Some(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    fn group_with(keys: &[i64]) -> EntityGroup {
        let mut group = EntityGroup::new(TypeName::new("Order"));
        for &k in keys {
            group
                .insert(Entity::new("Order", k).with_field("customerId", Value::Integer(1)))
                .unwrap();
        }
        group
    }

    #[test]
    fn test_by_key() {
        let group = group_with(&[10, 11, 12]);
        assert_eq!(group.len(), 3);
        assert_eq!(
            group.by_key(&KeyValue::from(11i64)).unwrap().key(),
            &KeyValue::from(11i64)
        );
        assert!(group.by_key(&KeyValue::from(99i64)).is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut group = group_with(&[10]);
        let err = group.insert(Entity::new("Order", 10i64)).unwrap_err();
        assert!(matches!(err, StoreError::EntityAlreadyExists(_)));
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut group = group_with(&[10, 11, 12]);
        let removed = group.remove(&KeyValue::from(10i64)).unwrap();
        assert_eq!(removed.key(), &KeyValue::from(10i64));
        assert_eq!(group.len(), 2);

        // The swapped-in tail entity is still reachable by key.
        assert!(group.by_key(&KeyValue::from(12i64)).is_some());
        assert!(group.by_key(&KeyValue::from(11i64)).is_some());
        assert!(group.by_key(&KeyValue::from(10i64)).is_none());
    }
}
