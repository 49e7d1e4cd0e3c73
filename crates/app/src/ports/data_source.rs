//! Data source port — what a polling coordinator fetches.

use std::future::Future;

use hearth_domain::error::HubError;

/// A remote query that produces a complete snapshot on every call.
///
/// Implementations must return the whole dataset; the coordinator replaces
/// its previous value wholesale and never merges.
pub trait DataSource: Send + Sync + 'static {
    /// The snapshot type produced by one fetch.
    type Data: Send + Sync + 'static;

    /// Fetch a fresh snapshot.
    fn fetch(&self) -> impl Future<Output = Result<Self::Data, HubError>> + Send;
}
