use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use catalog_core::{Relation, Resource};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PeerMethod {
    Post,
    Delete,
    Patch,
}

impl PeerMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeerMethod::Post => "POST",
            PeerMethod::Delete => "DELETE",
            PeerMethod::Patch => "PATCH",
        }
    }
}

impl core::fmt::Display for PeerMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request to a peer store, as planned by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeerCall {
    /// `POST {target}/{owner}/{relation}/{related}`
    Link {
        target: Resource,
        owner: Uuid,
        relation: Relation,
        related: Uuid,
    },
    /// `DELETE {target}/{owner}/{relation}/{related}`
    Unlink {
        target: Resource,
        owner: Uuid,
        relation: Relation,
        related: Uuid,
    },
    /// `PATCH images/{image}` with `{"product_id": product}`; `None` detaches.
    AssignImage { image: Uuid, product: Option<Uuid> },
}

impl PeerCall {
    pub fn target(&self) -> Resource {
        match self {
            PeerCall::Link { target, .. } | PeerCall::Unlink { target, .. } => *target,
            PeerCall::AssignImage { .. } => Resource::Images,
        }
    }

    pub fn method(&self) -> PeerMethod {
        match self {
            PeerCall::Link { .. } => PeerMethod::Post,
            PeerCall::Unlink { .. } => PeerMethod::Delete,
            PeerCall::AssignImage { .. } => PeerMethod::Patch,
        }
    }

    /// Path relative to the target service root, without a leading slash.
    pub fn path(&self) -> String {
        match self {
            PeerCall::Link {
                target,
                owner,
                relation,
                related,
            }
            | PeerCall::Unlink {
                target,
                owner,
                relation,
                related,
            } => format!("{target}/{owner}/{relation}/{related}"),
            PeerCall::AssignImage { image, .. } => format!("images/{image}"),
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            PeerCall::AssignImage { product, .. } => Some(json!({ "product_id": product })),
            _ => None,
        }
    }
}

impl core::fmt::Display for PeerCall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} /{}", self.method(), self.path())
    }
}

#[derive(Debug, Error)]
pub enum PeerError {
    /// Connection refused, timeout, DNS failure...
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer answered with a non-2xx status.
    #[error("peer responded {status}: {body}")]
    Status { status: u16, body: String },
}

impl PeerError {
    /// Transport failures and 5xx may succeed on a later attempt; 4xx will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            PeerError::Transport(_) => true,
            PeerError::Status { status, .. } => *status >= 500,
        }
    }
}

/// Outbound side of the sync protocol.
#[async_trait]
pub trait PeerClient: Send + Sync {
    async fn send(&self, call: &PeerCall) -> Result<(), PeerError>;

    /// Human-readable location of `call`, used in logs.
    fn locate(&self, call: &PeerCall) -> String {
        format!("/{}", call.path())
    }
}

#[async_trait]
impl<C> PeerClient for Arc<C>
where
    C: PeerClient + ?Sized,
{
    async fn send(&self, call: &PeerCall) -> Result<(), PeerError> {
        (**self).send(call).await
    }

    fn locate(&self, call: &PeerCall) -> String {
        (**self).locate(call)
    }
}
