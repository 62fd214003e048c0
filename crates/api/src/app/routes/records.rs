//! CRUD endpoints shared by every resource.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;

use catalog_core::Record;

use crate::app::dto::ListQuery;
use crate::app::errors;
use crate::app::services::Catalog;

pub fn router<R>() -> Router
where
    R: Record,
    R::Draft: DeserializeOwned,
    R::Patch: DeserializeOwned,
{
    Router::new()
        .route("/", post(create::<R>).get(list::<R>))
        .route(
            "/:id",
            get(read::<R>)
                .put(update::<R>)
                .patch(update::<R>)
                .delete(delete::<R>),
        )
}

pub async fn create<R>(
    Extension(catalog): Extension<Arc<Catalog<R>>>,
    Json(body): Json<R::Draft>,
) -> axum::response::Response
where
    R: Record,
    R::Draft: DeserializeOwned,
{
    match catalog.create(body).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list<R: Record>(
    Extension(catalog): Extension<Arc<Catalog<R>>>,
    Query(query): Query<ListQuery>,
) -> axum::response::Response {
    match catalog.list(query.page()).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn read<R: Record>(
    Extension(catalog): Extension<Arc<Catalog<R>>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match catalog.get(&id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// PUT and PATCH share partial-field semantics.
pub async fn update<R>(
    Extension(catalog): Extension<Arc<Catalog<R>>>,
    Path(id): Path<String>,
    Json(body): Json<R::Patch>,
) -> axum::response::Response
where
    R: Record,
    R::Patch: DeserializeOwned,
{
    match catalog.update(&id, body).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete<R: Record>(
    Extension(catalog): Extension<Arc<Catalog<R>>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match catalog.delete(&id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
