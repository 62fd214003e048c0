//! Images domain module.
//!
//! An image belongs to at most one product. `product_id` on the image is the
//! single source of truth for that relationship; the product's `image_ids`
//! is a cache maintained through sync calls.

pub mod image;

pub use image::{Image, ImagePatch, NewImage};
