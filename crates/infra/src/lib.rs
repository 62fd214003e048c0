//! Infrastructure layer: storage, relationship sync, config.
//!
//! - `store`: repositories (in-memory, Postgres)
//! - `entity_store`: id parsing + CRUD/link operations over a repository
//! - `sync`: diff, routing, peer clients and the dispatcher
//! - `catalog_service`: local write followed by sync, used by the HTTP layer

pub mod catalog_service;
pub mod config;
pub mod entity_store;
pub mod store;
pub mod sync;

mod integration_tests;

pub use catalog_service::CatalogService;
pub use config::{ConfigError, ServiceConfig};
pub use entity_store::{parse_id, EntityStore, Transition};
pub use store::{InMemoryRepository, Page, PostgresRepository, Repository, StoreError, StoreResult};
pub use sync::{HttpPeerClient, PeerClient, RetryPolicy, SyncDispatcher};
