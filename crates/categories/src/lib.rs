//! Categories domain module.

pub mod category;

pub use category::{Category, CategoryPatch, NewCategory};
