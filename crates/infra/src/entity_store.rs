//! Generic CRUD + relationship operations over one record type.
//!
//! Ids arrive as raw strings from the HTTP layer and are parsed here, so a
//! malformed id is always `InvalidId` (422) and never reaches storage.

use std::marker::PhantomData;

use uuid::Uuid;

use catalog_core::{DomainError, DomainResult, Record, Relation};

use crate::store::{Page, Repository, StoreResult};

/// Parse a path/body id into a UUID.
pub fn parse_id(raw: &str) -> DomainResult<Uuid> {
    raw.trim()
        .parse::<Uuid>()
        .map_err(|_| DomainError::invalid_id(format!("Invalid UUID: {raw}")))
}

/// Record state on both sides of a committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<R> {
    pub before: R,
    pub after: R,
}

#[derive(Debug, Clone)]
pub struct EntityStore<R, S> {
    repo: S,
    _record: PhantomData<fn() -> R>,
}

impl<R, S> EntityStore<R, S>
where
    R: Record,
    S: Repository<R>,
{
    pub fn new(repo: S) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    /// Validate the draft and persist it. A caller-supplied id that is
    /// already taken is a `Conflict`.
    pub async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let record = R::from_draft(draft)?;
        self.repo.insert(record).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<R> {
        let key = parse_id(id)?;
        self.repo.get(key).await?.ok_or_else(|| DomainError::NotFound.into())
    }

    pub async fn list(&self, page: Page) -> StoreResult<Vec<R>> {
        self.repo.list(page).await
    }

    /// Apply a partial update. Validation happens before anything is written.
    pub async fn update(&self, id: &str, patch: R::Patch) -> StoreResult<Transition<R>> {
        let key = parse_id(id)?;
        let (before, after) = self
            .repo
            .modify(key, Box::new(move |record: &mut R| record.apply_patch(patch)))
            .await?;
        Ok(Transition { before, after })
    }

    pub async fn delete(&self, id: &str) -> StoreResult<R> {
        let key = parse_id(id)?;
        self.repo.remove(key).await
    }

    /// Idempotent: adding an id that is already present changes nothing.
    pub async fn add_relationship(&self, id: &str, relation: Relation, other_id: &str) -> StoreResult<R> {
        let other = parse_id(other_id)?;
        let key = parse_id(id)?;
        let (_, after) = self
            .repo
            .modify(
                key,
                Box::new(move |record: &mut R| record.link(relation, other).map(|_| ())),
            )
            .await?;
        Ok(after)
    }

    /// Idempotent: removing an absent id changes nothing.
    pub async fn remove_relationship(&self, id: &str, relation: Relation, other_id: &str) -> StoreResult<R> {
        let other = parse_id(other_id)?;
        let key = parse_id(id)?;
        let (_, after) = self
            .repo
            .modify(
                key,
                Box::new(move |record: &mut R| record.unlink(relation, other).map(|_| ())),
            )
            .await?;
        Ok(after)
    }
}
