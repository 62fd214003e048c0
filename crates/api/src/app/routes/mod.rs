//! One router per resource; a process mounts exactly one of them.

pub mod categories;
pub mod images;
pub mod links;
pub mod products;
pub mod records;
pub mod suppliers;
pub mod system;
