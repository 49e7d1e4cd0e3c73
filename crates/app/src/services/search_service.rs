//! Search service — the `media.search` service call.

use hearth_domain::error::HubError;
use hearth_domain::media::{SearchRequest, SearchResults};

use crate::ports::MusicClient;

/// Validates search requests and forwards them to one music server.
pub struct SearchService<M> {
    client: M,
}

impl<M: MusicClient> SearchService<M> {
    /// Create a service bound to the given client.
    pub fn new(client: M) -> Self {
        Self { client }
    }

    /// Handle raw service-call data and answer with the compact result dict.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when `data` does not match the search
    /// schema, or [`HubError::Remote`] when the music server fails.
    #[tracing::instrument(skip(self, data))]
    pub async fn handle(&self, data: &serde_json::Value) -> Result<serde_json::Value, HubError> {
        let request = SearchRequest::from_service_data(data)?;
        let results = self.search(&request).await?;
        serde_json::to_value(results.to_compact()).map_err(|err| HubError::Storage(Box::new(err)))
    }

    /// Run an already validated search.
    ///
    /// # Errors
    ///
    /// Propagates the music client's error.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResults, HubError> {
        let query = request.query();
        let media_types = request.effective_media_types();
        tracing::debug!(
            %query,
            limit = request.limit,
            library_only = request.library_only,
            "searching music server"
        );
        let results = self
            .client
            .search(&query, &media_types, request.limit, request.library_only)
            .await?;
        tracing::debug!(count = results.len(), "search finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use hearth_domain::error::{RemoteError, ValidationError};
    use hearth_domain::media::{MediaItem, MediaType};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedCall {
        query: String,
        media_types: Vec<MediaType>,
        limit: u32,
        library_only: bool,
    }

    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<RecordedCall>>,
        results: SearchResults,
        fail: bool,
    }

    impl MusicClient for RecordingClient {
        async fn search(
            &self,
            query: &str,
            media_types: &[MediaType],
            limit: u32,
            library_only: bool,
        ) -> Result<SearchResults, HubError> {
            self.calls.lock().unwrap().push(RecordedCall {
                query: query.to_string(),
                media_types: media_types.to_vec(),
                limit,
                library_only,
            });
            if self.fail {
                return Err(RemoteError::new("music server", "not connected").into());
            }
            Ok(self.results.clone())
        }
    }

    fn track(name: &str) -> MediaItem {
        MediaItem {
            item_id: "1".to_string(),
            provider: "library".to_string(),
            name: name.to_string(),
            uri: "library://track/1".to_string(),
            media_type: MediaType::Track,
            version: None,
            image: None,
            artists: Vec::new(),
            album: None,
            in_library: true,
        }
    }

    #[tokio::test]
    async fn should_forward_composed_query_with_defaults() {
        let service = SearchService::new(RecordingClient::default());

        service
            .handle(&json!({"name": "Come Together", "artist": "The Beatles", "album": "Abbey Road"}))
            .await
            .unwrap();

        let calls = service.client.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![RecordedCall {
                query: "The Beatles - Abbey Road - Come Together".to_string(),
                media_types: MediaType::ALL.to_vec(),
                limit: 5,
                library_only: false,
            }]
        );
    }

    #[tokio::test]
    async fn should_forward_explicit_media_types_limit_and_library_flag() {
        let service = SearchService::new(RecordingClient::default());

        service
            .handle(&json!({
                "name": "Abbey Road",
                "media_type": "album",
                "limit": "2",
                "library_only": "yes"
            }))
            .await
            .unwrap();

        let call = service.client.calls.lock().unwrap()[0].clone();
        assert_eq!(call.media_types, vec![MediaType::Album]);
        assert_eq!(call.limit, 2);
        assert!(call.library_only);
    }

    #[tokio::test]
    async fn should_return_compact_results() {
        let client = RecordingClient {
            results: SearchResults {
                tracks: vec![track("Something")],
                ..SearchResults::default()
            },
            ..RecordingClient::default()
        };
        let service = SearchService::new(client);

        let response = service.handle(&json!({"name": "Something"})).await.unwrap();

        assert_eq!(
            response["tracks"],
            json!([{"uri": "library://track/1", "name": "Something", "artists": []}])
        );
        assert_eq!(response["artists"], json!([]));
    }

    #[tokio::test]
    async fn should_not_call_client_when_validation_fails() {
        let service = SearchService::new(RecordingClient::default());

        let result = service.handle(&json!({"limit": 3})).await;

        assert!(matches!(
            result,
            Err(HubError::Validation(ValidationError::MissingField("name")))
        ));
        assert!(service.client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_propagate_client_failure() {
        let client = RecordingClient {
            fail: true,
            ..RecordingClient::default()
        };
        let service = SearchService::new(client);

        let result = service.handle(&json!({"name": "x"})).await;
        assert!(matches!(result, Err(HubError::Remote(_))));
    }
}
