//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository, peer client and dispatcher wiring
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;

use catalog_categories::Category;
use catalog_core::{Record, Resource};
use catalog_images::Image;
use catalog_infra::ServiceConfig;
use catalog_products::Product;
use catalog_suppliers::Supplier;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the HTTP router for the resource named in `config`
/// (public entrypoint used by `main.rs` and the black-box tests).
pub async fn build_app(config: ServiceConfig) -> anyhow::Result<Router> {
    let pool = match &config.database_url {
        Some(url) => Some(PgPool::connect(url).await?),
        None => None,
    };

    let resource = match config.service {
        Resource::Products => mount(
            routes::products::router(),
            services::build_catalog::<Product>(&config, pool).await?,
        ),
        Resource::Suppliers => mount(
            routes::suppliers::router(),
            services::build_catalog::<Supplier>(&config, pool).await?,
        ),
        Resource::Categories => mount(
            routes::categories::router(),
            services::build_catalog::<Category>(&config, pool).await?,
        ),
        Resource::Images => mount(
            routes::images::router(),
            services::build_catalog::<Image>(&config, pool).await?,
        ),
    };

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(resource)
        .layer(ServiceBuilder::new().layer(Extension(config.service))))
}

fn mount<R: Record>(router: Router, catalog: services::Catalog<R>) -> Router {
    Router::new().nest(
        &format!("/{}", R::RESOURCE),
        router.layer(Extension(Arc::new(catalog))),
    )
}
