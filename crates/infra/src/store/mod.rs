//! Record storage boundary.
//!
//! Each service owns exactly one repository holding one resource type. The
//! relationship-id lists are embedded in the stored record (no join tables);
//! the sync protocol exists because of that denormalization.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryRepository;
pub use postgres::PostgresRepository;
pub use r#trait::{Mutation, Page, Repository, StoreError, StoreResult};
