//! Service configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. Optional `catalog.toml` in the working directory
//! 3. Environment variables: `CATALOG_*` (e.g. `CATALOG_SERVICE=supplier`)
//!
//! ```toml
//! service = "products"
//! bind_addr = "0.0.0.0:8002"
//! supplier_base_url = "http://suppliers.internal:8001"
//! sync_retries = 2
//! ```
//!
//! Base URLs are service roots; the resource path segment is appended per call.

use std::ops::Deref;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use catalog_core::Resource;

use crate::sync::{PeerUrls, RetryPolicy};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Which resource this process serves.
    pub service: Resource,
    /// Listen address; defaults to the resource's conventional port.
    #[serde(default)]
    pub bind_addr: Option<String>,
    #[serde(default = "default_product_url")]
    pub product_base_url: String,
    #[serde(default = "default_supplier_url")]
    pub supplier_base_url: String,
    #[serde(default = "default_category_url")]
    pub category_base_url: String,
    #[serde(default = "default_image_url")]
    pub image_base_url: String,
    /// Per-call timeout for sync requests.
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Extra attempts for a sync call after a transport error or 5xx.
    #[serde(default = "default_retries")]
    pub sync_retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub sync_retry_backoff_ms: u64,
    /// When set, records live in Postgres instead of memory.
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_product_url() -> String {
    "http://localhost:8002".to_string()
}

fn default_supplier_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_category_url() -> String {
    "http://localhost:8003".to_string()
}

fn default_image_url() -> String {
    "http://localhost:8004".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_retries() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    100
}

/// Conventional port of each service.
pub fn default_port(service: Resource) -> u16 {
    match service {
        Resource::Suppliers => 8001,
        Resource::Products => 8002,
        Resource::Categories => 8003,
        Resource::Images => 8004,
    }
}

impl ServiceConfig {
    /// Load config with layered resolution (file → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("catalog.toml"))
                .merge(Env::prefixed("CATALOG_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(ConfigError::from)
    }

    /// All defaults for `service`.
    pub fn for_service(service: Resource) -> Self {
        Self {
            service,
            bind_addr: None,
            product_base_url: default_product_url(),
            supplier_base_url: default_supplier_url(),
            category_base_url: default_category_url(),
            image_base_url: default_image_url(),
            http_timeout_secs: default_timeout_secs(),
            sync_retries: default_retries(),
            sync_retry_backoff_ms: default_backoff_ms(),
            database_url: None,
        }
    }

    pub fn bind_addr(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| format!("0.0.0.0:{}", default_port(self.service)))
    }

    pub fn peer_urls(&self) -> PeerUrls {
        PeerUrls {
            products: self.product_base_url.clone(),
            suppliers: self.supplier_base_url.clone(),
            categories: self.category_base_url.clone(),
            images: self.image_base_url.clone(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.sync_retries,
            backoff: Duration::from_millis(self.sync_retry_backoff_ms),
        }
    }
}
