use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use catalog_core::{DomainError, DomainResult, Record};

/// In-place edit applied to a record inside a single-row transaction.
pub type Mutation<R> = Box<dyn FnOnce(&mut R) -> DomainResult<()> + Send>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Deterministic domain failure (validation, not found, id clash).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage backend failed (connection, serialization, lock poisoning).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Offset/limit pagination over storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

/// Persistence for one record type.
///
/// Every method is a single-row unit of work: it either fully commits or
/// leaves the stored state unchanged.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Persist a new record. `Conflict` if the id is already taken.
    async fn insert(&self, record: R) -> StoreResult<R>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<R>>;

    /// Records in storage (insertion) order.
    async fn list(&self, page: Page) -> StoreResult<Vec<R>>;

    /// Apply `mutation` to the stored record and commit the result.
    ///
    /// Returns the state before and after. `NotFound` if the id is absent; if
    /// the mutation fails nothing is written.
    async fn modify(&self, id: Uuid, mutation: Mutation<R>) -> StoreResult<(R, R)>;

    /// Delete a record, returning its last state. `NotFound` if absent.
    async fn remove(&self, id: Uuid) -> StoreResult<R>;
}

#[async_trait]
impl<R, S> Repository<R> for Arc<S>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    async fn insert(&self, record: R) -> StoreResult<R> {
        (**self).insert(record).await
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<R>> {
        (**self).get(id).await
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<R>> {
        (**self).list(page).await
    }

    async fn modify(&self, id: Uuid, mutation: Mutation<R>) -> StoreResult<(R, R)> {
        (**self).modify(id, mutation).await
    }

    async fn remove(&self, id: Uuid) -> StoreResult<R> {
        (**self).remove(id).await
    }
}
