use axum::Router;

use catalog_core::Relation;
use catalog_products::Product;

use super::{links, records};

pub fn router() -> Router {
    records::router::<Product>()
        .merge(links::router::<Product>(Relation::Suppliers))
        .merge(links::router::<Product>(Relation::Categories))
        .merge(links::router::<Product>(Relation::Images))
}
