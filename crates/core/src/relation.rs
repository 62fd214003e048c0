//! Resources served by the catalog services and the relationships between them.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// One independently deployed resource store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    #[serde(alias = "product")]
    Products,
    #[serde(alias = "supplier")]
    Suppliers,
    #[serde(alias = "category")]
    Categories,
    #[serde(alias = "image")]
    Images,
}

impl Resource {
    /// URL path segment (`/products`, `/suppliers`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Suppliers => "suppliers",
            Resource::Categories => "categories",
            Resource::Images => "images",
        }
    }

    /// Service name reported by `/health` and used in logs.
    pub fn service_name(&self) -> &'static str {
        match self {
            Resource::Products => "product",
            Resource::Suppliers => "supplier",
            Resource::Categories => "category",
            Resource::Images => "image",
        }
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "products" | "product" => Ok(Resource::Products),
            "suppliers" | "supplier" => Ok(Resource::Suppliers),
            "categories" | "category" => Ok(Resource::Categories),
            "images" | "image" => Ok(Resource::Images),
            other => Err(DomainError::validation(format!("unknown resource: {other}"))),
        }
    }
}

/// A relationship field held by a resource.
///
/// The variant names the *other* side: `Products::Suppliers` is the product's
/// `supplier_ids`, `Suppliers::Products` the supplier's `product_ids`, and
/// `Product` the image's single `product_id`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Suppliers,
    Categories,
    Images,
    Products,
    Product,
}

impl Relation {
    /// URL path segment for link endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Suppliers => "suppliers",
            Relation::Categories => "categories",
            Relation::Images => "images",
            Relation::Products => "products",
            Relation::Product => "product",
        }
    }

    /// JSON key carrying a single related id (body form of link requests).
    pub fn id_field(&self) -> &'static str {
        match self {
            Relation::Suppliers => "supplier_id",
            Relation::Categories => "category_id",
            Relation::Images => "image_id",
            Relation::Products | Relation::Product => "product_id",
        }
    }

    /// Resource that owns the other end of this relationship.
    pub fn target(&self) -> Resource {
        match self {
            Relation::Suppliers => Resource::Suppliers,
            Relation::Categories => Resource::Categories,
            Relation::Images => Resource::Images,
            Relation::Products | Relation::Product => Resource::Products,
        }
    }
}

impl core::fmt::Display for Relation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suppliers" => Ok(Relation::Suppliers),
            "categories" => Ok(Relation::Categories),
            "images" => Ok(Relation::Images),
            "products" => Ok(Relation::Products),
            "product" => Ok(Relation::Product),
            other => Err(DomainError::validation(format!("unknown relation: {other}"))),
        }
    }
}

/// Snapshot of one relationship field, as untyped ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationState {
    pub relation: Relation,
    pub ids: Vec<Uuid>,
}

impl RelationState {
    pub fn new(relation: Relation, ids: Vec<Uuid>) -> Self {
        Self { relation, ids }
    }

    /// Same relation with no ids (the "before" of a create, the "after" of a delete).
    pub fn cleared(&self) -> Self {
        Self {
            relation: self.relation,
            ids: Vec::new(),
        }
    }
}
