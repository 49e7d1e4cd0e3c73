//! In-memory stand-ins for the integration and music client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use hearth_app::event_bus::InProcessEventBus;
use hearth_app::ports::{Integration, IntegrationContext, MusicClient};
use hearth_app::services::search_service::SearchService;
use hearth_app::services::state_registry::StateRegistry;
use hearth_domain::device::Device;
use hearth_domain::entity::{AttributeValue, Entity, EntityState};
use hearth_domain::error::{HubError, NotFoundError, RemoteError, ValidationError};
use hearth_domain::id::EntityId;
use hearth_domain::media::{MediaItem, MediaType, SearchResults};

use crate::state::AppState;

pub(crate) type TestState = AppState<StubIntegration, InProcessEventBus, StubMusic>;

/// Writes confirmed states into the registry itself, like the lock projector.
pub(crate) struct StubIntegration {
    entity: Entity,
    registry: StateRegistry<InProcessEventBus>,
    offline: AtomicBool,
    polled: Mutex<Option<EntityState>>,
    pub calls: Mutex<Vec<String>>,
}

impl StubIntegration {
    pub fn fail_commands(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Store `state` right after the next confirmed command, as a poll
    /// finishing mid-call would.
    pub fn poll_during_call(&self, state: EntityState) {
        *self.polled.lock().unwrap() = Some(state);
    }
}

impl Integration for StubIntegration {
    fn name(&self) -> &'static str {
        "lock"
    }

    async fn setup(&mut self, _ctx: &impl IntegrationContext) -> Result<(), HubError> {
        Ok(())
    }

    async fn handle_service_call(
        &self,
        entity_id: EntityId,
        service: &str,
        _data: serde_json::Value,
    ) -> Result<Entity, HubError> {
        if entity_id != self.entity.id {
            return Err(NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            }
            .into());
        }
        let state = match service {
            "lock" => EntityState::Locked,
            "unlock" => EntityState::Unlocked,
            other => return Err(ValidationError::UnsupportedService(other.to_string()).into()),
        };
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::new("stub cloud", "offline").into());
        }
        self.calls.lock().unwrap().push(service.to_string());
        let mut entity = self.entity.clone();
        entity.state = state;
        let confirmed = self.registry.upsert_entity(entity).await?;

        let polled = self.polled.lock().unwrap().take();
        if let Some(state) = polled {
            let mut newer = confirmed.clone();
            newer.state = state;
            self.registry.upsert_entity(newer).await?;
        }
        Ok(confirmed)
    }

    async fn teardown(&self) -> Result<(), HubError> {
        Ok(())
    }
}

/// Answers every search with one track named after the query.
pub(crate) struct StubMusic;

impl MusicClient for StubMusic {
    async fn search(
        &self,
        query: &str,
        media_types: &[MediaType],
        _limit: u32,
        _library_only: bool,
    ) -> Result<SearchResults, HubError> {
        let mut results = SearchResults::default();
        if media_types.contains(&MediaType::Track) {
            results.tracks.push(MediaItem {
                item_id: "1".to_string(),
                provider: "stub".to_string(),
                name: query.to_string(),
                uri: "stub://track/1".to_string(),
                media_type: MediaType::Track,
                version: None,
                image: None,
                artists: Vec::new(),
                album: None,
                in_library: true,
            });
        }
        Ok(results)
    }
}

/// A registry holding one unlocked `lock.vault_door`, wired into an [`AppState`].
pub(crate) async fn test_state() -> (TestState, Arc<StubIntegration>) {
    let events = InProcessEventBus::new(64);
    let registry = StateRegistry::new(events.clone());

    let device = registry
        .upsert_device(
            Device::builder()
                .name("Vault Door")
                .manufacturer("Schlage")
                .model("<model-name>")
                .sw_version("1.0")
                .integration("lock")
                .unique_id("test")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    let entity = registry
        .upsert_entity(
            Entity::builder()
                .device_id(device.id)
                .entity_id("lock.vault_door")
                .friendly_name("Vault Door")
                .state(EntityState::Unlocked)
                .attribute("changed_by", AttributeValue::from("thumbturn"))
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    let integration = Arc::new(StubIntegration {
        entity,
        registry: registry.clone(),
        offline: AtomicBool::new(false),
        polled: Mutex::new(None),
        calls: Mutex::new(Vec::new()),
    });
    let state = AppState::new(
        Arc::clone(&integration),
        registry,
        SearchService::new(StubMusic),
        events,
    );
    (state, integration)
}
