//! Music client port — the music server answering searches.

use std::future::Future;
use std::sync::Arc;

use hearth_domain::error::HubError;
use hearth_domain::media::{MediaType, SearchResults};

/// A connection to one music server.
///
/// Callers hold the specific client they want to talk to; there is no
/// process-wide lookup of "the" active server.
pub trait MusicClient: Send + Sync {
    /// Run a free-text search restricted to `media_types`, returning at most
    /// `limit` items per type.
    fn search(
        &self,
        query: &str,
        media_types: &[MediaType],
        limit: u32,
        library_only: bool,
    ) -> impl Future<Output = Result<SearchResults, HubError>> + Send;
}

impl<T: MusicClient> MusicClient for Arc<T> {
    fn search(
        &self,
        query: &str,
        media_types: &[MediaType],
        limit: u32,
        library_only: bool,
    ) -> impl Future<Output = Result<SearchResults, HubError>> + Send {
        (**self).search(query, media_types, limit, library_only)
    }
}
