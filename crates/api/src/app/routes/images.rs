use axum::Router;

use catalog_images::Image;

use super::records;

/// Images have no link endpoints: ownership changes arrive as
/// `PATCH /images/:id` with `product_id`.
pub fn router() -> Router {
    records::router::<Image>()
}
