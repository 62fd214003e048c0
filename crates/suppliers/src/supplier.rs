use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_core::{
    no_relation, validate, DomainResult, Entity, IdList, ProductId, Record, Relation, RelationState,
    Resource, SupplierId,
};

/// Supplier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    name: String,
    contact: String,
    product_ids: IdList<ProductId>,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewSupplier {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Contact email address.
    pub contact: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

/// Partial update; absent and null fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SupplierPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub product_ids: Option<Vec<String>>,
}

impl Supplier {
    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn product_ids(&self) -> &IdList<ProductId> {
        &self.product_ids
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Supplier {
    type Draft = NewSupplier;
    type Patch = SupplierPatch;

    const RESOURCE: Resource = Resource::Suppliers;

    fn from_draft(draft: NewSupplier) -> DomainResult<Self> {
        let id = SupplierId::parse_or_new(draft.id.as_deref())?;
        validate::name("name", &draft.name)?;
        validate::email("contact", &draft.contact)?;

        Ok(Self {
            id,
            name: draft.name,
            contact: draft.contact,
            product_ids: IdList::parse(&draft.product_ids)?,
        })
    }

    fn apply_patch(&mut self, patch: SupplierPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            validate::name("name", name)?;
        }
        if let Some(contact) = &patch.contact {
            validate::email("contact", contact)?;
        }
        let product_ids = patch.product_ids.as_deref().map(IdList::parse).transpose()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
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

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::DomainError;

    const P1: &str = "00000000-0000-0000-0000-0000000000b1";
    const P2: &str = "00000000-0000-0000-0000-0000000000b2";

    fn draft() -> NewSupplier {
        NewSupplier {
            id: None,
            name: "Acme".to_string(),
            contact: "sales@acme.com".to_string(),
            product_ids: vec![],
        }
    }

    #[test]
    fn create_supplier_with_products() {
        let supplier = Supplier::from_draft(NewSupplier {
            product_ids: vec![P1.to_string(), P2.to_string(), P1.to_string()],
            ..draft()
        })
        .unwrap();
        assert_eq!(supplier.name(), "Acme");
        assert_eq!(supplier.product_ids().len(), 2);
        assert_eq!(supplier.product_ids().as_slice()[0].to_string(), P1);
    }

    #[test]
    fn create_rejects_bad_contact() {
        let err = Supplier::from_draft(NewSupplier {
            contact: "not-an-email".to_string(),
            ..draft()
        })
        .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("contact")),
            other => panic!("Expected Validation error for contact, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_long_name() {
        assert!(Supplier::from_draft(NewSupplier { name: "s".repeat(2000), ..draft() }).is_ok());
        assert!(Supplier::from_draft(NewSupplier { name: "s".repeat(2001), ..draft() }).is_err());
    }

    #[test]
    fn patch_contact_is_revalidated() {
        let mut supplier = Supplier::from_draft(draft()).unwrap();
        assert!(supplier
            .apply_patch(SupplierPatch {
                contact: Some("broken@".to_string()),
                ..SupplierPatch::default()
            })
            .is_err());
        assert_eq!(supplier.contact(), "sales@acme.com");

        supplier
            .apply_patch(SupplierPatch {
                contact: Some("orders@acme.com".to_string()),
                ..SupplierPatch::default()
            })
            .unwrap();
        assert_eq!(supplier.contact(), "orders@acme.com");
    }

    #[test]
    fn link_unlink_products() {
        let mut supplier = Supplier::from_draft(draft()).unwrap();
        let p1: Uuid = P1.parse().unwrap();
        assert!(supplier.link(Relation::Products, p1).unwrap());
        assert!(!supplier.link(Relation::Products, p1).unwrap());
        assert!(supplier.unlink(Relation::Products, p1).unwrap());
        assert!(!supplier.unlink(Relation::Products, p1).unwrap());
        assert!(supplier.link(Relation::Categories, p1).is_err());
    }

    #[test]
    fn null_fields_in_patch_are_ignored() {
        let patch: SupplierPatch = serde_json::from_value(serde_json::json!({
            "name": null,
            "product_ids": null
        }))
        .unwrap();
        assert_eq!(patch, SupplierPatch::default());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: linking the same product any number of times stores it once.
            #[test]
            fn repeated_links_store_once(times in 1usize..20) {
                let mut supplier = Supplier::from_draft(draft()).unwrap();
                let p1: Uuid = P1.parse().unwrap();
                for _ in 0..times {
                    supplier.link(Relation::Products, p1).unwrap();
                }
                prop_assert_eq!(supplier.product_ids().len(), 1);
            }
        }
    }
}
