//! Shared application state for axum handlers.

use std::sync::Arc;

use hearth_app::event_bus::InProcessEventBus;
use hearth_app::ports::{EventPublisher, Integration, MusicClient};
use hearth_app::services::search_service::SearchService;
use hearth_app::services::state_registry::StateRegistry;

/// Application state shared across all axum handlers.
///
/// Generic over the lock integration, the registry's event publisher and the
/// music client to avoid dynamic dispatch. `Clone` is implemented manually so
/// the integration and music client do not need to be `Clone`.
pub struct AppState<I, EP, M> {
    /// Integration receiving `lock` service calls.
    pub integration: Arc<I>,
    /// Presentation state pushed by integrations.
    pub registry: StateRegistry<EP>,
    /// `media.search` service.
    pub search: Arc<SearchService<M>>,
    /// Event bus feeding the SSE stream.
    pub events: InProcessEventBus,
}

impl<I, EP: Clone, M> Clone for AppState<I, EP, M> {
    fn clone(&self) -> Self {
        Self {
            integration: Arc::clone(&self.integration),
            registry: self.registry.clone(),
            search: Arc::clone(&self.search),
            events: self.events.clone(),
        }
    }
}

impl<I, EP, M> AppState<I, EP, M>
where
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Clone + Send + Sync + 'static,
    M: MusicClient + 'static,
{
    /// Create a new application state.
    ///
    /// The integration is taken as an `Arc` so the composition root can keep
    /// a handle for teardown.
    pub fn new(
        integration: Arc<I>,
        registry: StateRegistry<EP>,
        search: SearchService<M>,
        events: InProcessEventBus,
    ) -> Self {
        Self {
            integration,
            registry,
            search: Arc::new(search),
            events,
        }
    }
}
