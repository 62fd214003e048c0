use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_core::{
    no_relation, validate, CategoryId, DomainResult, Entity, IdList, ProductId, Record, Relation,
    RelationState, Resource,
};

/// Category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    description: String,
    product_ids: IdList<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCategory {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_ids: Option<Vec<String>>,
}

impl Category {
    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn product_ids(&self) -> &IdList<ProductId> {
        &self.product_ids
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Category {
    type Draft = NewCategory;
    type Patch = CategoryPatch;

    const RESOURCE: Resource = Resource::Categories;

    fn from_draft(draft: NewCategory) -> DomainResult<Self> {
        let id = CategoryId::parse_or_new(draft.id.as_deref())?;
        validate::name("name", &draft.name)?;
        validate::description("description", &draft.description)?;

        Ok(Self {
            id,
            name: draft.name,
            description: draft.description,
            product_ids: IdList::parse(&draft.product_ids)?,
        })
    }

    fn apply_patch(&mut self, patch: CategoryPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            validate::name("name", name)?;
        }
        if let Some(description) = &patch.description {
            validate::description("description", description)?;
        }
        let product_ids = patch.product_ids.as_deref().map(IdList::parse).transpose()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(ids) = product_ids {
            self.product_ids = ids;
        }
        Ok(())
    }

    fn relations(&self) -> Vec<RelationState> {
        vec![RelationState::new(Relation::Products, self.product_ids.to_uuids())]
    }

    fn link(&mut self, relation: Relation, related: Uuid) -> DomainResult<bool> {
        match relation {
            Relation::Products => Ok(self.product_ids.insert(related.into())),
            other => Err(no_relation::<Self>(other)),
        }
    }

    fn unlink(&mut self, relation: Relation, related: Uuid) -> DomainResult<bool> {
        match relation {
            Relation::Products => Ok(self.product_ids.remove(related.into())),
            other => Err(no_relation::<Self>(other)),
        }
    }
}
