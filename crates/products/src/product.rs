use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_core::{
    no_relation, validate, CategoryId, DomainError, DomainResult, Entity, IdList, ImageId,
    ProductId, Record, Relation, RelationState, Resource, SupplierId,
};

/// Number of decimal places prices are stored with.
pub const PRICE_SCALE: u32 = 2;

/// Product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    quantity: i64,
    price: Decimal,
    supplier_ids: IdList<SupplierId>,
    category_ids: IdList<CategoryId>,
    image_ids: IdList<ImageId>,
}

/// Create payload. Ids arrive as raw strings and are validated on build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: i64,
    pub price: Decimal,
    #[serde(default)]
    pub supplier_ids: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub image_ids: Vec<String>,
}

/// Partial update. `None` (absent or null) leaves the field untouched; a
/// present relationship list replaces the stored one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub supplier_ids: Option<Vec<String>>,
    #[serde(default)]
    pub category_ids: Option<Vec<String>>,
    #[serde(default)]
    pub image_ids: Option<Vec<String>>,
}

impl Product {
    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn supplier_ids(&self) -> &IdList<SupplierId> {
        &self.supplier_ids
    }

    pub fn category_ids(&self) -> &IdList<CategoryId> {
        &self.category_ids
    }

    pub fn image_ids(&self) -> &IdList<ImageId> {
        &self.image_ids
    }
}

fn check_quantity(quantity: i64) -> DomainResult<i64> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity must be >= 0"));
    }
    Ok(quantity)
}

/// Round to [`PRICE_SCALE`] places (half away from zero) and require the
/// stored value to be strictly positive.
fn canonical_price(raw: Decimal) -> DomainResult<Decimal> {
    let mut price = raw.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(PRICE_SCALE);
    if price <= Decimal::ZERO {
        return Err(DomainError::validation("price must be > 0"));
    }
    Ok(price)
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Product {
    type Draft = NewProduct;
    type Patch = ProductPatch;

    const RESOURCE: Resource = Resource::Products;

    fn from_draft(draft: NewProduct) -> DomainResult<Self> {
        let id = ProductId::parse_or_new(draft.id.as_deref())?;
        validate::name("name", &draft.name)?;
        validate::description("description", &draft.description)?;

        Ok(Self {
            id,
            name: draft.name,
            description: draft.description,
            quantity: check_quantity(draft.quantity)?,
            price: canonical_price(draft.price)?,
            supplier_ids: IdList::parse(&draft.supplier_ids)?,
            category_ids: IdList::parse(&draft.category_ids)?,
            image_ids: IdList::parse(&draft.image_ids)?,
        })
    }

    fn apply_patch(&mut self, patch: ProductPatch) -> DomainResult<()> {
        // Validate everything before touching state.
        if let Some(name) = &patch.name {
            validate::name("name", name)?;
        }
        if let Some(description) = &patch.description {
            validate::description("description", description)?;
        }
        let quantity = patch.quantity.map(check_quantity).transpose()?;
        let price = patch.price.map(canonical_price).transpose()?;
        let supplier_ids = patch.supplier_ids.as_deref().map(IdList::parse).transpose()?;
        let category_ids = patch.category_ids.as_deref().map(IdList::parse).transpose()?;
        let image_ids = patch.image_ids.as_deref().map(IdList::parse).transpose()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(ids) = supplier_ids {
            self.supplier_ids = ids;
        }
        if let Some(ids) = category_ids {
            self.category_ids = ids;
        }
        if let Some(ids) = image_ids {
            self.image_ids = ids;
        }
        Ok(())
    }

    fn relations(&self) -> Vec<RelationState> {
        vec![
            RelationState::new(Relation::Suppliers, self.supplier_ids.to_uuids()),
            RelationState::new(Relation::Categories, self.category_ids.to_uuids()),
            RelationState::new(Relation::Images, self.image_ids.to_uuids()),
        ]
    }

    fn link(&mut self, relation: Relation, related: Uuid) -> DomainResult<bool> {
        match relation {
            Relation::Suppliers => Ok(self.supplier_ids.insert(related.into())),
            Relation::Categories => Ok(self.category_ids.insert(related.into())),
            Relation::Images => Ok(self.image_ids.insert(related.into())),
            other => Err(no_relation::<Self>(other)),
        }
    }

    fn unlink(&mut self, relation: Relation, related: Uuid) -> DomainResult<bool> {
        match relation {
            Relation::Suppliers => Ok(self.supplier_ids.remove(related.into())),
            Relation::Categories => Ok(self.category_ids.remove(related.into())),
            Relation::Images => Ok(self.image_ids.remove(related.into())),
            other => Err(no_relation::<Self>(other)),
        }
    }
}
