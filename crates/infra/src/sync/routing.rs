//! Which peer call mirrors a relationship change.
//!
//! | Source     | Relation   | Added id                                    | Removed id            |
//! |------------|------------|---------------------------------------------|-----------------------|
//! | products   | suppliers  | `POST suppliers/{sid}/products/{pid}`       | `DELETE` same path    |
//! | products   | categories | `POST categories/{cid}/products/{pid}`      | `DELETE` same path    |
//! | products   | images     | `PATCH images/{iid}` `{"product_id": pid}`  | same with `null`      |
//! | suppliers  | products   | `POST products/{pid}/suppliers/{sid}`       | `DELETE` same path    |
//! | categories | products   | `POST products/{pid}/categories/{cid}`      | `DELETE` same path    |
//! | images     | product    | `POST products/{pid}/images/{iid}`          | `DELETE` same path    |

use uuid::Uuid;

use catalog_core::{Relation, Resource};

use super::peer::PeerCall;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Change {
    Added,
    Removed,
}

/// Relation name the target uses to point back at `source`.
fn back_relation(source: Resource) -> Relation {
    match source {
        Resource::Products => Relation::Products,
        Resource::Suppliers => Relation::Suppliers,
        Resource::Categories => Relation::Categories,
        Resource::Images => Relation::Images,
    }
}

/// Peer call that mirrors `related` being added to or removed from
/// `entity.relation`. `None` for pairs with no counterpart.
pub fn route(
    source: Resource,
    entity: Uuid,
    relation: Relation,
    related: Uuid,
    change: Change,
) -> Option<PeerCall> {
    let target = relation.target();
    if target == source {
        return None;
    }

    if source == Resource::Products && relation == Relation::Images {
        let product = match change {
            Change::Added => Some(entity),
            Change::Removed => None,
        };
        return Some(PeerCall::AssignImage {
            image: related,
            product,
        });
    }

    // The related record becomes the owner on the peer side.
    let back = back_relation(source);
    Some(match change {
        Change::Added => PeerCall::Link {
            target,
            owner: related,
            relation: back,
            related: entity,
        },
        Change::Removed => PeerCall::Unlink {
            target,
            owner: related,
            relation: back,
            related: entity,
        },
    })
}
