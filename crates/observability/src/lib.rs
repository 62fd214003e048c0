//! Process-wide tracing setup shared by every catalog service.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize logging from the environment (`RUST_LOG`, `CATALOG_LOG_FORMAT`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
