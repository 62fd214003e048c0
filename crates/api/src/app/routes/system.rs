use axum::{extract::Extension, response::IntoResponse, Json};

use catalog_core::Resource;

pub async fn health(Extension(service): Extension<Resource>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": service.service_name(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
