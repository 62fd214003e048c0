//! Local write + relationship sync for one resource.
//!
//! `CatalogService` is what the HTTP routes call. Every client-facing write
//! commits locally first and then hands the before/after relation lists to
//! the dispatcher; the local result is returned regardless of how sync went.
//!
//! Peer link endpoints (`add_relationship` / `remove_relationship`) are the
//! receiving side of sync and never dispatch, which keeps a sync call from
//! bouncing back and forth between two services.

use tracing::info;

use catalog_core::{Record, Relation, RelationState};

use crate::entity_store::EntityStore;
use crate::store::{Page, Repository, StoreResult};
use crate::sync::{PeerClient, SyncDispatcher};

pub struct CatalogService<R, S, C> {
    store: EntityStore<R, S>,
    dispatcher: SyncDispatcher<C>,
}

impl<R, S, C> CatalogService<R, S, C>
where
    R: Record,
    S: Repository<R>,
    C: PeerClient,
{
    pub fn new(store: EntityStore<R, S>, dispatcher: SyncDispatcher<C>) -> Self {
        Self { store, dispatcher }
    }

    pub async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let record = self.store.create(draft).await?;
        info!(resource = %R::RESOURCE, id = %record.key(), "record created");
        self.dispatcher.dispatch_created(record.key(), &record.relations()).await;
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<R> {
        self.store.get(id).await
    }

    pub async fn list(&self, page: Page) -> StoreResult<Vec<R>> {
        self.store.list(page).await
    }

    /// PUT and PATCH both land here.
    pub async fn update(&self, id: &str, patch: R::Patch) -> StoreResult<R> {
        let t = self.store.update(id, patch).await?;
        info!(resource = %R::RESOURCE, id = %t.after.key(), "record updated");
        self.dispatcher
            .dispatch(t.after.key(), &t.before.relations(), &t.after.relations())
            .await;
        Ok(t.after)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<R> {
        let removed = self.store.delete(id).await?;
        info!(resource = %R::RESOURCE, id = %removed.key(), "record deleted");
        let relations: Vec<RelationState> = removed.relations();
        self.dispatcher.dispatch_deleted(removed.key(), &relations).await;
        Ok(removed)
    }

    pub async fn add_relationship(&self, id: &str, relation: Relation, other_id: &str) -> StoreResult<R> {
        self.store.add_relationship(id, relation, other_id).await
    }

    pub async fn remove_relationship(&self, id: &str, relation: Relation, other_id: &str) -> StoreResult<R> {
        self.store.remove_relationship(id, relation, other_id).await
    }
}
