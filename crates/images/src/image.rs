use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_core::{
    validate, DomainResult, Entity, ImageId, Patch, ProductId, Record, Relation, RelationState,
    Resource,
};

/// Image record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    id: ImageId,
    url: String,
    product_id: Option<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewImage {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub product_id: Option<String>,
}

/// Partial update. `product_id` is tri-state: absent leaves the owner alone,
/// `null` detaches, a value re-attaches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImagePatch {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub product_id: Patch<String>,
}

impl Image {
    pub fn id_typed(&self) -> ImageId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }
}

impl Entity for Image {
    type Id = ImageId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Image {
    type Draft = NewImage;
    type Patch = ImagePatch;

    const RESOURCE: Resource = Resource::Images;

    fn from_draft(draft: NewImage) -> DomainResult<Self> {
        let id = ImageId::parse_or_new(draft.id.as_deref())?;
        let url = validate::http_url("url", &draft.url)?;
        let product_id = draft.product_id.as_deref().map(str::parse::<ProductId>).transpose()?;

        Ok(Self { id, url, product_id })
    }

    fn apply_patch(&mut self, patch: ImagePatch) -> DomainResult<()> {
        let url = patch
            .url
            .as_deref()
            .map(|u| validate::http_url("url", u))
            .transpose()?;
        let product_id = patch
            .product_id
            .into_change()
            .map(|owner| owner.as_deref().map(str::parse::<ProductId>).transpose())
            .transpose()?;

        if let Some(url) = url {
            self.url = url;
        }
        if let Some(owner) = product_id {
            self.product_id = owner;
        }
        Ok(())
    }

    fn relations(&self) -> Vec<RelationState> {
        let ids = self.product_id.map(Uuid::from).into_iter().collect();
        vec![RelationState::new(Relation::Product, ids)]
    }
}
