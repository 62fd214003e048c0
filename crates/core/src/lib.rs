//! `catalog-core`: shared building blocks for the catalog services.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no storage):
//! identifiers, relationship-id lists, patch fields, validation helpers and the
//! `Record` trait every entity implements to plug into the generic store.

pub mod entity;
pub mod error;
pub mod id;
pub mod id_list;
pub mod patch;
pub mod relation;
pub mod validate;

pub use entity::{no_relation, Entity, Record};
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ImageId, ProductId, SupplierId};
pub use id_list::IdList;
pub use patch::Patch;
pub use relation::{Relation, RelationState, Resource};
