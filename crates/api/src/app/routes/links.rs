//! Peer link endpoints. These only touch the local record; they are what the
//! other services call while syncing.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{Map, Value};

use catalog_core::{Record, Relation};

use crate::app::services::Catalog;
use crate::app::{dto, errors};

/// `POST /:id/{relation}` (body form) plus
/// `POST|DELETE /:id/{relation}/:related_id`.
pub fn router<R: Record>(relation: Relation) -> Router {
    Router::new()
        .route(
            &format!("/:id/{relation}"),
            post(
                move |Extension(catalog): Extension<Arc<Catalog<R>>>,
                      Path(id): Path<String>,
                      Json(body): Json<Map<String, Value>>| async move {
                    match dto::related_id(relation, &body) {
                        Ok(related) => link(catalog, id, relation, related).await,
                        Err(e) => errors::domain_error_to_response(e),
                    }
                },
            ),
        )
        .route(
            &format!("/:id/{relation}/:related_id"),
            post(
                move |Extension(catalog): Extension<Arc<Catalog<R>>>,
                      Path((id, related)): Path<(String, String)>| async move {
                    link(catalog, id, relation, related).await
                },
            )
            .delete(
                move |Extension(catalog): Extension<Arc<Catalog<R>>>,
                      Path((id, related)): Path<(String, String)>| async move {
                    unlink(catalog, id, relation, related).await
                },
            ),
        )
}

pub async fn link<R: Record>(
    catalog: Arc<Catalog<R>>,
    id: String,
    relation: Relation,
    related: String,
) -> axum::response::Response {
    match catalog.add_relationship(&id, relation, &related).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn unlink<R: Record>(
    catalog: Arc<Catalog<R>>,
    id: String,
    relation: Relation,
    related: String,
) -> axum::response::Response {
    match catalog.remove_relationship(&id, relation, &related).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
