//! Service-call handlers: `lock.lock`, `lock.unlock` and `media.search`.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use hearth_app::ports::{EventPublisher, Integration, IntegrationContext, MusicClient};
use hearth_domain::entity::Entity;
use hearth_domain::event::{Event, EventType};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a lock service call.
#[derive(Deserialize)]
pub struct LockServiceRequest {
    /// Target entity, e.g. `lock.vault_door`.
    pub entity_id: String,
    /// Extra service data, passed through to the integration.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// `POST /api/services/lock/{service}`
///
/// Returns the entity as stored after the integration confirmed the command.
/// The integration owns entity writes; the handler only reads back, so a
/// poll landing during the call is never overwritten with older state.
pub async fn call_lock<I, EP, M>(
    State(state): State<AppState<I, EP, M>>,
    Path(service): Path<String>,
    Json(request): Json<LockServiceRequest>,
) -> Result<Json<Entity>, ApiError>
where
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Clone + Send + Sync + 'static,
    M: MusicClient + 'static,
{
    let target = state.registry.get_entity(&request.entity_id)?;
    state
        .integration
        .handle_service_call(target.id, &service, request.data)
        .await?;
    let stored = state.registry.get_entity(&request.entity_id)?;

    state
        .registry
        .publish(Event::new(
            EventType::ServiceCalled,
            Some(stored.id),
            serde_json::json!({
                "domain": state.integration.name(),
                "service": service,
                "entity_id": stored.entity_id,
            }),
        ))
        .await?;
    Ok(Json(stored))
}

/// `POST /api/services/media/search`
///
/// The body is the raw service data (`name`, `artist`, `album`,
/// `media_type`, `limit`, `library_only`).
pub async fn search<I, EP, M>(
    State(state): State<AppState<I, EP, M>>,
    Json(data): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Clone + Send + Sync + 'static,
    M: MusicClient + 'static,
{
    Ok(Json(state.search.handle(&data).await?))
}
