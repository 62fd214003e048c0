use serde::Deserialize;
use serde_json::{Map, Value};

use catalog_core::{DomainError, DomainResult, Relation};
use catalog_infra::Page;

// -------------------------
// Request DTOs
// -------------------------

/// `?skip=&limit=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip.unwrap_or(0), self.limit.unwrap_or(Page::DEFAULT_LIMIT))
    }
}

/// Pull the related id out of a body-form link request,
/// e.g. `{"supplier_id": "..."}` for the suppliers relation.
pub fn related_id(relation: Relation, body: &Map<String, Value>) -> DomainResult<String> {
    let field = relation.id_field();
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DomainError::validation(format!("{field} must be a string"))),
        None => Err(DomainError::validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn list_query_defaults() {
        assert_eq!(ListQuery::default().page(), Page::new(0, 100));
        let q = ListQuery { skip: Some(5), limit: None };
        assert_eq!(q.page(), Page::new(5, 100));
    }

    #[test]
    fn related_id_uses_singular_field() {
        let id = related_id(Relation::Suppliers, &body(json!({ "supplier_id": "abc" }))).unwrap();
        assert_eq!(id, "abc");
        assert!(related_id(Relation::Suppliers, &body(json!({ "product_id": "abc" }))).is_err());
        assert!(related_id(Relation::Categories, &body(json!({ "category_id": 7 }))).is_err());
    }
}
