//! Relationship sync dispatcher.
//!
//! After a local write commits, the dispatcher diffs the record's relation
//! lists (before vs after), routes every added/removed id to the peer call
//! that mirrors it, and sends those calls.
//!
//! ## Failure Semantics
//!
//! Sync is best-effort. A failed call is logged at `warn` with method, URL
//! and the peer status/body (or transport error) and then dropped; it never
//! fails or rolls back the local write. Calls are sent sequentially, and a
//! failure does not stop the remaining calls.
//!
//! ## Retry
//!
//! Transport errors and 5xx responses are retried up to
//! `RetryPolicy::max_retries` times with linear backoff. 4xx responses are
//! final.

use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use catalog_core::{RelationState, Resource};

use super::diff::diff;
use super::peer::{PeerCall, PeerClient, PeerError};
use super::routing::{route, Change};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Delay before retry `n` is `backoff * n`.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(100),
        }
    }
}

/// Outcome of one dispatch. Only used for logging and tests; it is never
/// surfaced to the client of the local write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: Vec<PeerCall>,
    pub dropped: Vec<PeerCall>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SyncDispatcher<C> {
    source: Resource,
    client: C,
    retry: RetryPolicy,
}

impl<C: PeerClient> SyncDispatcher<C> {
    pub fn new(source: Resource, client: C, retry: RetryPolicy) -> Self {
        Self {
            source,
            client,
            retry,
        }
    }

    /// Peer calls that mirror the transition `before -> after` of `entity`.
    ///
    /// For each relation, additions come first (new-list order), then
    /// removals (old-list order).
    pub fn plan(&self, entity: Uuid, before: &[RelationState], after: &[RelationState]) -> Vec<PeerCall> {
        let mut calls = Vec::new();
        for delta in diff(before, after) {
            for related in &delta.to_add {
                calls.extend(route(self.source, entity, delta.relation, *related, Change::Added));
            }
            for related in &delta.to_remove {
                calls.extend(route(self.source, entity, delta.relation, *related, Change::Removed));
            }
        }
        calls
    }

    pub async fn dispatch(
        &self,
        entity: Uuid,
        before: &[RelationState],
        after: &[RelationState],
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let calls = self.plan(entity, before, after);
        if calls.is_empty() {
            return report;
        }
        for call in calls {
            match self.deliver(&call).await {
                Ok(()) => report.delivered.push(call),
                Err(_) => report.dropped.push(call),
            }
        }
        info!(
            source = %self.source,
            entity = %entity,
            delivered = report.delivered.len(),
            dropped = report.dropped.len(),
            "relationship sync dispatched"
        );
        report
    }

    /// A freshly created record: every relation id is an addition.
    pub async fn dispatch_created(&self, entity: Uuid, relations: &[RelationState]) -> DispatchReport {
        let empty: Vec<_> = relations.iter().map(RelationState::cleared).collect();
        self.dispatch(entity, &empty, relations).await
    }

    /// A deleted record: every relation id is a removal.
    pub async fn dispatch_deleted(&self, entity: Uuid, relations: &[RelationState]) -> DispatchReport {
        let empty: Vec<_> = relations.iter().map(RelationState::cleared).collect();
        self.dispatch(entity, relations, &empty).await
    }

    async fn deliver(&self, call: &PeerCall) -> Result<(), PeerError> {
        let mut attempt = 0u32;
        loop {
            match self.client.send(call).await {
                Ok(()) => {
                    debug!(method = %call.method(), url = %self.client.locate(call), "sync call delivered");
                    return Ok(());
                }
                Err(err) => {
                    let will_retry = err.is_retryable() && attempt < self.retry.max_retries;
                    match &err {
                        PeerError::Status { status, body } => warn!(
                            method = %call.method(),
                            url = %self.client.locate(call),
                            status = *status,
                            body = %body,
                            attempt = attempt + 1,
                            will_retry,
                            "sync call rejected by peer"
                        ),
                        PeerError::Transport(error) => warn!(
                            method = %call.method(),
                            url = %self.client.locate(call),
                            error = %error,
                            attempt = attempt + 1,
                            will_retry,
                            "sync call failed"
                        ),
                    }
                    if !will_retry {
                        return Err(err);
                    }
                    attempt += 1;
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                }
            }
        }
    }
}
