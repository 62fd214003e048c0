//! Duplicate-free, insertion-ordered relationship-id lists.
//!
//! Every relationship field stored on an entity is an `IdList`. Inserting an
//! id that is already present, or removing one that is absent, leaves the list
//! untouched; the first-seen order of ids is preserved.

use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdList<T>(Vec<T>);

impl<T> IdList<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for IdList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> IdList<T> {
    /// Append `id` unless present. Returns whether the list changed.
    pub fn insert(&mut self, id: T) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Remove `id` if present. Returns whether the list changed.
    pub fn remove(&mut self, id: T) -> bool {
        let before = self.0.len();
        self.0.retain(|x| *x != id);
        self.0.len() != before
    }

    pub fn contains(&self, id: T) -> bool {
        self.0.contains(&id)
    }
}

impl<T> IdList<T>
where
    T: Copy + Eq + Hash + FromStr<Err = DomainError>,
{
    /// Parse raw caller-supplied ids, rejecting the whole list on the first
    /// malformed entry and dropping repeats.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> DomainResult<Self> {
        raw.iter().map(|s| s.as_ref().parse::<T>()).collect()
    }
}

impl<T> IdList<T>
where
    T: Copy + Into<Uuid>,
{
    /// Untyped view used by the sync dispatcher.
    pub fn to_uuids(&self) -> Vec<Uuid> {
        self.0.iter().map(|id| (*id).into()).collect()
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for IdList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        Self(iter.into_iter().filter(|id| seen.insert(*id)).collect())
    }
}

impl<'a, T> IntoIterator for &'a IdList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de, T> Deserialize<'de> for IdList<T>
where
    T: Copy + Eq + Hash + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<T>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}
