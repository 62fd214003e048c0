//! Suppliers domain module.
//!
//! A supplier holds the ids of the products it supplies; the product side
//! holds the mirror list.

pub mod supplier;

pub use supplier::{NewSupplier, Supplier, SupplierPatch};
