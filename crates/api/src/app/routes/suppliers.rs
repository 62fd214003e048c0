use axum::Router;

use catalog_core::Relation;
use catalog_suppliers::Supplier;

use super::{links, records};

pub fn router() -> Router {
    records::router::<Supplier>().merge(links::router::<Supplier>(Relation::Products))
}
