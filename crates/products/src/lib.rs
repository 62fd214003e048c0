//! Products domain module.
//!
//! Business rules for products, implemented as deterministic domain logic
//! (no IO, no HTTP, no storage). A product owns three relationship lists:
//! suppliers and categories (symmetric) and images (a cache of the images
//! whose `product_id` points here).

pub mod product;

pub use product::{NewProduct, Product, ProductPatch};
