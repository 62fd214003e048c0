use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use catalog_core::{DomainError, Record};

use super::r#trait::{Mutation, Page, Repository, StoreError, StoreResult};

#[derive(Debug)]
struct Rows<R> {
    next_seq: u64,
    by_seq: BTreeMap<u64, R>,
    seq_of: HashMap<Uuid, u64>,
}

/// In-memory repository.
///
/// Intended for tests/dev. Records are kept in insertion order.
#[derive(Debug)]
pub struct InMemoryRepository<R> {
    rows: RwLock<Rows<R>>,
}

impl<R> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Rows {
                next_seq: 0,
                by_seq: BTreeMap::new(),
                seq_of: HashMap::new(),
            }),
        }
    }
}

impl<R> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    async fn insert(&self, record: R) -> StoreResult<R> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let key = record.key();
        if rows.seq_of.contains_key(&key) {
            return Err(DomainError::conflict(format!("{} {key} already exists", R::RESOURCE)).into());
        }
        let seq = rows.next_seq;
        rows.next_seq += 1;
        rows.seq_of.insert(key, seq);
        rows.by_seq.insert(seq, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<R>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.seq_of.get(&id).and_then(|seq| rows.by_seq.get(seq)).cloned())
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<R>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows
            .by_seq
            .values()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect())
    }

    async fn modify(&self, id: Uuid, mutation: Mutation<R>) -> StoreResult<(R, R)> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let seq = *rows.seq_of.get(&id).ok_or(DomainError::NotFound)?;
        let slot = rows.by_seq.get_mut(&seq).ok_or(DomainError::NotFound)?;

        // Mutate a scratch copy so a failed mutation leaves the row intact.
        let before = slot.clone();
        let mut after = before.clone();
        mutation(&mut after)?;
        *slot = after.clone();
        Ok((before, after))
    }

    async fn remove(&self, id: Uuid) -> StoreResult<R> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let seq = rows.seq_of.remove(&id).ok_or(DomainError::NotFound)?;
        rows.by_seq.remove(&seq).ok_or_else(|| DomainError::NotFound.into())
    }
}
