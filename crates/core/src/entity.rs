//! Entity and record traits.

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::relation::{Relation, RelationState, Resource};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// A persisted entity owned by exactly one catalog service.
///
/// Implementations hold all validation rules for their resource, so the
/// generic store never needs to know field-level constraints. Relationship
/// fields are exposed as untyped UUID snapshots for the sync dispatcher.
pub trait Record: Entity<Id: Copy + Into<Uuid>> + Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Create payload (raw, unvalidated).
    type Draft: Send + 'static;
    /// Partial-update payload (raw, unvalidated).
    type Patch: Send + 'static;

    const RESOURCE: Resource;

    /// Identifier as a plain UUID (storage key).
    fn key(&self) -> Uuid {
        (*self.id()).into()
    }

    /// Validate a draft and build the record, generating an id when absent.
    fn from_draft(draft: Self::Draft) -> DomainResult<Self>;

    /// Apply the fields present in `patch`. On error `self` may be partially
    /// modified; callers apply patches to a scratch copy.
    fn apply_patch(&mut self, patch: Self::Patch) -> DomainResult<()>;

    /// Current state of every relationship field, in a fixed order.
    fn relations(&self) -> Vec<RelationState>;

    /// Idempotently add `related` to `relation`. Returns whether state changed.
    ///
    /// Resources without peer link endpoints keep the default, which rejects
    /// every relation.
    fn link(&mut self, relation: Relation, _related: Uuid) -> DomainResult<bool> {
        Err(no_relation::<Self>(relation))
    }

    /// Idempotently remove `related` from `relation`. Returns whether state changed.
    fn unlink(&mut self, relation: Relation, _related: Uuid) -> DomainResult<bool> {
        Err(no_relation::<Self>(relation))
    }
}

/// Error for a link or unlink on a relation the record does not hold.
pub fn no_relation<R: Record>(relation: Relation) -> DomainError {
    DomainError::validation(format!("{} have no {relation} relation", R::RESOURCE))
}
