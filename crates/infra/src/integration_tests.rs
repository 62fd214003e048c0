//! Cross-service scenarios, wired in memory.
//!
//! Four `CatalogService`s share a loopback peer client that applies each peer
//! call directly to the target store, the way the receiving HTTP route would.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use catalog_categories::{Category, CategoryPatch, NewCategory};
    use catalog_core::{DomainError, Patch, Record, Relation, Resource};
    use catalog_images::{Image, ImagePatch, NewImage};
    use catalog_products::{NewProduct, Product, ProductPatch};
    use catalog_suppliers::{NewSupplier, Supplier, SupplierPatch};

    use crate::catalog_service::CatalogService;
    use crate::entity_store::EntityStore;
    use crate::store::{InMemoryRepository, StoreError, StoreResult};
    use crate::sync::{PeerCall, PeerClient, PeerError, RetryPolicy, SyncDispatcher};

    type Repo<R> = Arc<InMemoryRepository<R>>;
    type Service<R> = CatalogService<R, Repo<R>, Arc<Loopback>>;

    struct Loopback {
        products: EntityStore<Product, Repo<Product>>,
        suppliers: EntityStore<Supplier, Repo<Supplier>>,
        categories: EntityStore<Category, Repo<Category>>,
        images: EntityStore<Image, Repo<Image>>,
        offline: Mutex<HashSet<Resource>>,
        sent: Mutex<Vec<PeerCall>>,
    }

    impl Loopback {
        fn take_sent(&self) -> Vec<PeerCall> {
            std::mem::take(&mut *self.sent.lock().unwrap())
        }

        fn go_offline(&self, resource: Resource) {
            self.offline.lock().unwrap().insert(resource);
        }
    }

    fn as_peer_error<T>(result: StoreResult<T>) -> Result<(), PeerError> {
        match result {
            Ok(_) => Ok(()),
            Err(StoreError::Domain(DomainError::NotFound)) => Err(PeerError::Status {
                status: 404,
                body: "not found".into(),
            }),
            Err(StoreError::Domain(e)) => Err(PeerError::Status {
                status: 422,
                body: e.to_string(),
            }),
            Err(StoreError::Backend(e)) => Err(PeerError::Status { status: 500, body: e }),
        }
    }

    #[async_trait]
    impl PeerClient for Loopback {
        async fn send(&self, call: &PeerCall) -> Result<(), PeerError> {
            self.sent.lock().unwrap().push(call.clone());
            if self.offline.lock().unwrap().contains(&call.target()) {
                return Err(PeerError::Transport("connection refused".into()));
            }

            match call {
                PeerCall::Link {
                    target,
                    owner,
                    relation,
                    related,
                } => {
                    let (owner, related) = (owner.to_string(), related.to_string());
                    match target {
                        Resource::Products => {
                            as_peer_error(self.products.add_relationship(&owner, *relation, &related).await)
                        }
                        Resource::Suppliers => {
                            as_peer_error(self.suppliers.add_relationship(&owner, *relation, &related).await)
                        }
                        Resource::Categories => {
                            as_peer_error(self.categories.add_relationship(&owner, *relation, &related).await)
                        }
                        Resource::Images => {
                            as_peer_error(self.images.add_relationship(&owner, *relation, &related).await)
                        }
                    }
                }
                PeerCall::Unlink {
                    target,
                    owner,
                    relation,
                    related,
                } => {
                    let (owner, related) = (owner.to_string(), related.to_string());
                    match target {
                        Resource::Products => {
                            as_peer_error(self.products.remove_relationship(&owner, *relation, &related).await)
                        }
                        Resource::Suppliers => {
                            as_peer_error(self.suppliers.remove_relationship(&owner, *relation, &related).await)
                        }
                        Resource::Categories => {
                            as_peer_error(self.categories.remove_relationship(&owner, *relation, &related).await)
                        }
                        Resource::Images => {
                            as_peer_error(self.images.remove_relationship(&owner, *relation, &related).await)
                        }
                    }
                }
                // The image service would echo a link back to products here;
                // that echo is idempotent, so the loopback applies the PATCH only.
                PeerCall::AssignImage { image, product } => {
                    let patch = ImagePatch {
                        url: None,
                        product_id: match product {
                            Some(p) => Patch::Value(p.to_string()),
                            None => Patch::Null,
                        },
                    };
                    as_peer_error(self.images.update(&image.to_string(), patch).await)
                }
            }
        }
    }

    struct Catalog {
        net: Arc<Loopback>,
        products: Service<Product>,
        suppliers: Service<Supplier>,
        categories: Service<Category>,
        images: Service<Image>,
    }

    fn service<R: Record>(repo: &Repo<R>, net: &Arc<Loopback>) -> Service<R> {
        CatalogService::new(
            EntityStore::new(repo.clone()),
            SyncDispatcher::new(R::RESOURCE, net.clone(), RetryPolicy::none()),
        )
    }

    fn setup() -> Catalog {
        let products: Repo<Product> = Arc::default();
        let suppliers: Repo<Supplier> = Arc::default();
        let categories: Repo<Category> = Arc::default();
        let images: Repo<Image> = Arc::default();

        let net = Arc::new(Loopback {
            products: EntityStore::new(products.clone()),
            suppliers: EntityStore::new(suppliers.clone()),
            categories: EntityStore::new(categories.clone()),
            images: EntityStore::new(images.clone()),
            offline: Mutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
        });

        Catalog {
            products: service(&products, &net),
            suppliers: service(&suppliers, &net),
            categories: service(&categories, &net),
            images: service(&images, &net),
            net,
        }
    }

    fn product(supplier_ids: &[Uuid], category_ids: &[Uuid], image_ids: &[Uuid]) -> NewProduct {
        let strs = |ids: &[Uuid]| ids.iter().map(Uuid::to_string).collect::<Vec<_>>();
        NewProduct {
            id: None,
            name: "Widget".to_string(),
            description: String::new(),
            quantity: 3,
            price: Decimal::new(999, 2),
            supplier_ids: strs(supplier_ids),
            category_ids: strs(category_ids),
            image_ids: strs(image_ids),
        }
    }

    async fn new_supplier(c: &Catalog) -> Uuid {
        c.suppliers
            .create(NewSupplier {
                id: None,
                name: "Acme".to_string(),
                contact: "sales@acme.com".to_string(),
                product_ids: vec![],
            })
            .await
            .unwrap()
            .key()
    }

    async fn new_category(c: &Catalog, name: &str) -> Uuid {
        c.categories
            .create(NewCategory {
                id: None,
                name: name.to_string(),
                description: String::new(),
                product_ids: vec![],
            })
            .await
            .unwrap()
            .key()
    }

    async fn new_image(c: &Catalog, owner: Option<Uuid>) -> Uuid {
        c.images
            .create(NewImage {
                id: None,
                url: "https://cdn.example.com/widget.png".to_string(),
                product_id: owner.map(|p| p.to_string()),
            })
            .await
            .unwrap()
            .key()
    }

    #[tokio::test]
    async fn creating_a_product_links_its_suppliers() {
        let c = setup();
        let s1 = new_supplier(&c).await;

        let p = c.products.create(product(&[s1], &[], &[])).await.unwrap();

        let supplier = c.suppliers.get(&s1.to_string()).await.unwrap();
        assert_eq!(supplier.product_ids().to_uuids(), vec![p.key()]);
    }

    #[tokio::test]
    async fn category_swap_sends_exactly_the_delta() {
        let c = setup();
        let (c1, c2, c3) = (
            new_category(&c, "a").await,
            new_category(&c, "b").await,
            new_category(&c, "c").await,
        );
        let p = c.products.create(product(&[], &[c1, c2], &[])).await.unwrap();
        c.net.take_sent();

        c.products
            .update(
                &p.key().to_string(),
                ProductPatch {
                    category_ids: Some(vec![c2.to_string(), c3.to_string()]),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            c.net.take_sent(),
            vec![
                PeerCall::Link {
                    target: Resource::Categories,
                    owner: c3,
                    relation: Relation::Products,
                    related: p.key(),
                },
                PeerCall::Unlink {
                    target: Resource::Categories,
                    owner: c1,
                    relation: Relation::Products,
                    related: p.key(),
                },
            ]
        );
        let key = p.key().to_string();
        assert!(c.categories.get(&c1.to_string()).await.unwrap().product_ids().is_empty());
        assert_eq!(c.categories.get(&c2.to_string()).await.unwrap().product_ids().len(), 1);
        assert_eq!(
            c.categories.get(&c3.to_string()).await.unwrap().product_ids().as_slice()[0].to_string(),
            key
        );
    }

    #[tokio::test]
    async fn unrelated_edits_send_nothing() {
        let c = setup();
        let s1 = new_supplier(&c).await;
        let p = c.products.create(product(&[s1], &[], &[])).await.unwrap();
        c.net.take_sent();

        c.products
            .update(
                &p.key().to_string(),
                ProductPatch {
                    name: Some("Renamed".to_string()),
                    supplier_ids: Some(vec![s1.to_string()]),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(c.net.take_sent().is_empty());
    }

    #[tokio::test]
    async fn dead_peer_does_not_fail_the_local_write() {
        let c = setup();
        let s1 = new_supplier(&c).await;
        c.net.go_offline(Resource::Suppliers);

        let p = c.products.create(product(&[s1], &[], &[])).await.unwrap();

        let stored = c.products.get(&p.key().to_string()).await.unwrap();
        assert_eq!(stored.supplier_ids().to_uuids(), vec![s1]);
        // Accepted drift: the supplier never heard about the product.
        assert!(c.suppliers.get(&s1.to_string()).await.unwrap().product_ids().is_empty());
    }

    #[tokio::test]
    async fn missing_peer_record_is_dropped_quietly() {
        let c = setup();
        let ghost = Uuid::new_v4();
        let p = c.products.create(product(&[ghost], &[], &[])).await.unwrap();
        assert_eq!(p.supplier_ids().to_uuids(), vec![ghost]);
    }

    #[tokio::test]
    async fn attaching_an_image_updates_the_product() {
        let c = setup();
        let p = c.products.create(product(&[], &[], &[])).await.unwrap();
        let img = new_image(&c, Some(p.key())).await;

        let stored = c.products.get(&p.key().to_string()).await.unwrap();
        assert_eq!(stored.image_ids().to_uuids(), vec![img]);
    }

    #[tokio::test]
    async fn detaching_an_image_sends_one_unlink() {
        let c = setup();
        let p = c.products.create(product(&[], &[], &[])).await.unwrap();
        let img = new_image(&c, Some(p.key())).await;
        c.net.take_sent();

        let detached = c
            .images
            .update(
                &img.to_string(),
                ImagePatch {
                    url: None,
                    product_id: Patch::Null,
                },
            )
            .await
            .unwrap();
        assert_eq!(detached.product_id(), None);

        assert_eq!(
            c.net.take_sent(),
            vec![PeerCall::Unlink {
                target: Resource::Products,
                owner: p.key(),
                relation: Relation::Images,
                related: img,
            }]
        );
        assert!(c.products.get(&p.key().to_string()).await.unwrap().image_ids().is_empty());
    }

    #[tokio::test]
    async fn moving_an_image_relinks_both_products() {
        let c = setup();
        let p1 = c.products.create(product(&[], &[], &[])).await.unwrap();
        let p2 = c.products.create(product(&[], &[], &[])).await.unwrap();
        let img = new_image(&c, Some(p1.key())).await;

        c.images
            .update(
                &img.to_string(),
                ImagePatch {
                    url: None,
                    product_id: Patch::Value(p2.key().to_string()),
                },
            )
            .await
            .unwrap();

        assert!(c.products.get(&p1.key().to_string()).await.unwrap().image_ids().is_empty());
        assert_eq!(
            c.products.get(&p2.key().to_string()).await.unwrap().image_ids().to_uuids(),
            vec![img]
        );
    }

    #[tokio::test]
    async fn product_image_list_drives_image_owner() {
        let c = setup();
        let img = new_image(&c, None).await;
        let p = c.products.create(product(&[], &[], &[img])).await.unwrap();
        assert_eq!(
            c.images.get(&img.to_string()).await.unwrap().product_id().map(Uuid::from),
            Some(p.key())
        );

        c.products
            .update(
                &p.key().to_string(),
                ProductPatch {
                    image_ids: Some(vec![]),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(c.images.get(&img.to_string()).await.unwrap().product_id(), None);
    }

    #[tokio::test]
    async fn deleting_a_product_unlinks_everything() {
        let c = setup();
        let s1 = new_supplier(&c).await;
        let c1 = new_category(&c, "a").await;
        let img = new_image(&c, None).await;
        let p = c.products.create(product(&[s1], &[c1], &[img])).await.unwrap();

        c.products.delete(&p.key().to_string()).await.unwrap();

        assert!(c.suppliers.get(&s1.to_string()).await.unwrap().product_ids().is_empty());
        assert!(c.categories.get(&c1.to_string()).await.unwrap().product_ids().is_empty());
        assert_eq!(c.images.get(&img.to_string()).await.unwrap().product_id(), None);
    }

    #[tokio::test]
    async fn supplier_side_edits_reach_products() {
        let c = setup();
        let p = c.products.create(product(&[], &[], &[])).await.unwrap();
        let s1 = new_supplier(&c).await;

        c.suppliers
            .update(
                &s1.to_string(),
                SupplierPatch {
                    product_ids: Some(vec![p.key().to_string()]),
                    ..SupplierPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            c.products.get(&p.key().to_string()).await.unwrap().supplier_ids().to_uuids(),
            vec![s1]
        );

        c.suppliers.delete(&s1.to_string()).await.unwrap();
        assert!(c.products.get(&p.key().to_string()).await.unwrap().supplier_ids().is_empty());
    }

    #[tokio::test]
    async fn category_side_edits_reach_products() {
        let c = setup();
        let p = c.products.create(product(&[], &[], &[])).await.unwrap();
        let c1 = new_category(&c, "a").await;

        c.categories
            .update(
                &c1.to_string(),
                CategoryPatch {
                    product_ids: Some(vec![p.key().to_string()]),
                    ..CategoryPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            c.products.get(&p.key().to_string()).await.unwrap().category_ids().to_uuids(),
            vec![c1]
        );
    }

    #[tokio::test]
    async fn link_endpoints_do_not_dispatch() {
        let c = setup();
        let s1 = new_supplier(&c).await;
        let p = c.products.create(product(&[], &[], &[])).await.unwrap();
        c.net.take_sent();

        c.products
            .add_relationship(&p.key().to_string(), Relation::Suppliers, &s1.to_string())
            .await
            .unwrap();
        c.products
            .remove_relationship(&p.key().to_string(), Relation::Suppliers, &s1.to_string())
            .await
            .unwrap();
        assert!(c.net.take_sent().is_empty());
    }

    #[tokio::test]
    async fn rejected_update_sends_nothing() {
        let c = setup();
        let s1 = new_supplier(&c).await;
        let p = c.products.create(product(&[], &[], &[])).await.unwrap();
        c.net.take_sent();

        let err = c
            .products
            .update(
                &p.key().to_string(),
                ProductPatch {
                    quantity: Some(-1),
                    supplier_ids: Some(vec![s1.to_string()]),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
        assert!(c.net.take_sent().is_empty());
        assert!(c.suppliers.get(&s1.to_string()).await.unwrap().product_ids().is_empty());
    }
}
