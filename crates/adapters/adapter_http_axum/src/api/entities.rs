//! JSON handlers for entities.

use axum::Json;
use axum::extract::{Path, State};

use hearth_app::ports::{EventPublisher, Integration, MusicClient};
use hearth_domain::entity::Entity;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/entities`
pub async fn list<I, EP, M>(State(state): State<AppState<I, EP, M>>) -> Json<Vec<Entity>>
where
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Clone + Send + Sync + 'static,
    M: MusicClient + 'static,
{
    Json(state.registry.list_entities())
}

/// `GET /api/entities/{entity_id}`, e.g. `/api/entities/lock.vault_door`.
pub async fn get<I, EP, M>(
    State(state): State<AppState<I, EP, M>>,
    Path(entity_id): Path<String>,
) -> Result<Json<Entity>, ApiError>
where
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Clone + Send + Sync + 'static,
    M: MusicClient + 'static,
{
    Ok(Json(state.registry.get_entity(&entity_id)?))
}
