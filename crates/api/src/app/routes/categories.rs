use axum::Router;

use catalog_categories::Category;
use catalog_core::Relation;

use super::{links, records};

pub fn router() -> Router {
    records::router::<Category>().merge(links::router::<Category>(Relation::Products))
}
