//! JSON handlers for devices.

use axum::Json;
use axum::extract::State;

use hearth_app::ports::{EventPublisher, Integration, MusicClient};
use hearth_domain::device::Device;

use crate::state::AppState;

/// `GET /api/devices`
pub async fn list<I, EP, M>(State(state): State<AppState<I, EP, M>>) -> Json<Vec<Device>>
where
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Clone + Send + Sync + 'static,
    M: MusicClient + 'static,
{
    Json(state.registry.list_devices())
}
