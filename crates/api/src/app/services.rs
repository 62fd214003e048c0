use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use catalog_core::Record;
use catalog_infra::{
    CatalogService, EntityStore, HttpPeerClient, InMemoryRepository, PeerClient,
    PostgresRepository, Repository, ServiceConfig, SyncDispatcher,
};

/// The service a resource router talks to: storage and peer client are
/// chosen at startup from config.
pub type Catalog<R> = CatalogService<R, Arc<dyn Repository<R>>, Arc<dyn PeerClient>>;

/// Postgres when a pool is given, otherwise in-memory.
pub async fn build_repository<R: Record>(pool: Option<PgPool>) -> anyhow::Result<Arc<dyn Repository<R>>> {
    match pool {
        Some(pool) => {
            let repo = PostgresRepository::<R>::new(pool);
            repo.ensure_schema().await?;
            info!(resource = %R::RESOURCE, backend = "postgres", "repository ready");
            Ok(Arc::new(repo))
        }
        None => {
            info!(resource = %R::RESOURCE, backend = "memory", "repository ready");
            Ok(Arc::new(InMemoryRepository::<R>::new()))
        }
    }
}

pub fn build_peer_client(config: &ServiceConfig) -> anyhow::Result<Arc<dyn PeerClient>> {
    let client = HttpPeerClient::new(config.peer_urls(), config.http_timeout())?;
    Ok(Arc::new(client))
}

pub async fn build_catalog<R: Record>(config: &ServiceConfig, pool: Option<PgPool>) -> anyhow::Result<Catalog<R>> {
    let repo = build_repository::<R>(pool).await?;
    let dispatcher = SyncDispatcher::new(R::RESOURCE, build_peer_client(config)?, config.retry_policy());
    Ok(CatalogService::new(EntityStore::new(repo), dispatcher))
}
