//! Diff-and-dispatch relationship sync between the catalog services.

pub mod diff;
pub mod dispatcher;
pub mod http;
pub mod peer;
pub mod routing;

pub use diff::{diff, RelationDelta};
pub use dispatcher::{DispatchReport, RetryPolicy, SyncDispatcher};
pub use http::{HttpPeerClient, PeerUrls};
pub use peer::{PeerCall, PeerClient, PeerError, PeerMethod};
pub use routing::{route, Change};
