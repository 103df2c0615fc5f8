use std::collections::HashSet;

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use uuid::Uuid;

use super::LexyError;

/// A record that lives in a [`Repository`]: identified by a unique id and checked before it is saved.
pub trait Record {
    fn id(&self) -> &str;

    fn validate(&self) -> Result<(), LexyError> {
        Ok(())
    }
}

pub fn new_record_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Ordered records with unique ids. Serialized as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Repository<T> {
    items: Vec<T>,
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from existing records without validating them, only checking ids.
    pub fn from_items(items: Vec<T>) -> Result<Self, LexyError> {
        {
            let mut seen = HashSet::new();
            for item in &items {
                if !seen.insert(item.id()) {
                    return Err(LexyError::DuplicateId(item.id().to_string()));
                }
            }
        }
        Ok(Self { items })
    }

    pub fn add(&mut self, record: T) -> Result<(), LexyError> {
        record.validate()?;
        if self.contains(record.id()) {
            return Err(LexyError::DuplicateId(record.id().to_string()));
        }
        self.items.push(record);
        Ok(())
    }

    /// Replaces the record stored under `id`. The replacement may carry a new id as long as
    /// no other record already uses it.
    pub fn update(&mut self, id: &str, record: T) -> Result<(), LexyError> {
        record.validate()?;
        let index = self.position(id).ok_or_else(|| LexyError::NotFound(id.to_string()))?;
        if record.id() != id && self.contains(record.id()) {
            return Err(LexyError::DuplicateId(record.id().to_string()));
        }
        self.items[index] = record;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<T, LexyError> {
        let index = self.position(id).ok_or_else(|| LexyError::NotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Mutable access for in-place edits that keep the id. Changing the id through this
    /// reference bypasses the uniqueness check; use [`Repository::update`] for that.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id()).collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}

impl<T> Repository<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<'a, T> IntoIterator for &'a Repository<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'de, T> Deserialize<'de> for Repository<T>
where
    T: Deserialize<'de> + Record,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Repository::from_items(items).map_err(serde::de::Error::custom)
    }
}
