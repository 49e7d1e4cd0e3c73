//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod entities;
#[allow(clippy::missing_errors_doc)]
pub mod services;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use hearth_app::ports::{EventPublisher, Integration, MusicClient};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<I, EP, M>() -> Router<AppState<I, EP, M>>
where
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Clone + Send + Sync + 'static,
    M: MusicClient + 'static,
{
    Router::new()
        // Entities
        .route("/entities", get(entities::list::<I, EP, M>))
        .route("/entities/{entity_id}", get(entities::get::<I, EP, M>))
        // Devices
        .route("/devices", get(devices::list::<I, EP, M>))
        // Services
        .route(
            "/services/lock/{service}",
            post(services::call_lock::<I, EP, M>),
        )
        .route(
            "/services/media/search",
            post(services::search::<I, EP, M>),
        )
        // Events
        .route("/events/stream", get(sse::stream::<I, EP, M>))
}
