//! In-memory registry of devices and entity states.
//!
//! [`StateRegistry`] is the presentation sink integrations push into through
//! the [`IntegrationContext`] port. Devices are keyed by
//! `(integration, unique_id)`, entities by their `entity_id` string; in both
//! cases the first UUID handed out is kept across upserts.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use hearth_domain::device::Device;
use hearth_domain::entity::Entity;
use hearth_domain::error::{HubError, NotFoundError};
use hearth_domain::event::{Event, EventType};
use hearth_domain::id::EntityId;
use hearth_domain::time::now;

use crate::ports::{EventPublisher, IntegrationContext};

#[derive(Default)]
struct Tables {
    devices: RwLock<HashMap<(String, String), Device>>,
    entities: RwLock<HashMap<String, Entity>>,
}

/// [`IntegrationContext`] implementation keeping everything in memory and
/// announcing changes on an [`EventPublisher`].
///
/// Cheaply cloneable; clones share the same tables.
pub struct StateRegistry<EP> {
    tables: Arc<Tables>,
    publisher: EP,
}

impl<EP: Clone> Clone for StateRegistry<EP> {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            publisher: self.publisher.clone(),
        }
    }
}

impl<EP> StateRegistry<EP> {
    /// Create an empty registry publishing through `publisher`.
    pub fn new(publisher: EP) -> Self {
        Self {
            tables: Arc::new(Tables::default()),
            publisher,
        }
    }

    /// Look up an entity by its `entity_id` string (e.g. `lock.vault_door`).
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no such entity was registered.
    pub fn get_entity(&self, entity_id: &str) -> Result<Entity, HubError> {
        self.entities_read()
            .get(entity_id)
            .cloned()
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Entity",
                    id: entity_id.to_string(),
                }
                .into()
            })
    }

    /// Look up an entity by its UUID.
    #[must_use]
    pub fn find_entity(&self, id: EntityId) -> Option<Entity> {
        self.entities_read()
            .values()
            .find(|entity| entity.id == id)
            .cloned()
    }

    /// All entities, ordered by `entity_id`.
    #[must_use]
    pub fn list_entities(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self.entities_read().values().cloned().collect();
        entities.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        entities
    }

    #[must_use]
    pub fn get_device(&self, integration: &str, unique_id: &str) -> Option<Device> {
        self.tables
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(integration.to_string(), unique_id.to_string()))
            .cloned()
    }

    /// All devices, ordered by name.
    #[must_use]
    pub fn list_devices(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self
            .tables
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        devices
    }

    fn entities_read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Entity>> {
        self.tables
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<EP> StateRegistry<EP>
where
    EP: EventPublisher + Send + Sync,
{
    fn store_device(&self, mut device: Device) -> (Device, bool) {
        let key = (device.integration.clone(), device.unique_id.clone());
        let mut devices = self
            .tables
            .devices
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let created = match devices.get(&key) {
            Some(existing) => {
                device.id = existing.id;
                false
            }
            None => true,
        };
        devices.insert(key, device.clone());
        (device, created)
    }

    fn store_entity(&self, mut entity: Entity) -> (Entity, Option<Event>) {
        let ts = now();
        let mut entities = self
            .tables
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let (stored, event) = match entities.get(&entity.entity_id) {
            Some(existing) => {
                let previous = existing.state;
                let mut updated = existing.clone();
                updated.device_id = entity.device_id;
                updated.friendly_name = entity.friendly_name;
                updated.update_state(entity.state, ts);
                updated.replace_attributes(entity.attributes, ts);
                let event = (previous != updated.state).then(|| {
                    Event::new(
                        EventType::StateChanged,
                        Some(updated.id),
                        serde_json::json!({
                            "entity_id": updated.entity_id,
                            "from": previous,
                            "to": updated.state,
                        }),
                    )
                });
                (updated, event)
            }
            None => {
                entity.last_changed = ts;
                entity.last_updated = ts;
                let event = Event::new(
                    EventType::EntityCreated,
                    Some(entity.id),
                    serde_json::json!({
                        "entity_id": entity.entity_id,
                        "state": entity.state,
                    }),
                );
                (entity, Some(event))
            }
        };

        entities.insert(stored.entity_id.clone(), stored.clone());
        (stored, event)
    }
}

impl<EP> IntegrationContext for StateRegistry<EP>
where
    EP: EventPublisher + Send + Sync,
{
    #[tracing::instrument(skip(self, device), fields(device_name = %device.name))]
    async fn upsert_device(&self, device: Device) -> Result<Device, HubError> {
        device.validate()?;
        let (device, created) = self.store_device(device);
        if created {
            tracing::info!(
                integration = %device.integration,
                unique_id = %device.unique_id,
                "device registered"
            );
            self.publisher
                .publish(Event::new(
                    EventType::DeviceRegistered,
                    None,
                    serde_json::json!({
                        "device_id": device.id,
                        "integration": device.integration,
                        "unique_id": device.unique_id,
                    }),
                ))
                .await?;
        }
        Ok(device)
    }

    #[tracing::instrument(skip(self, entity), fields(entity_id = %entity.entity_id))]
    async fn upsert_entity(&self, entity: Entity) -> Result<Entity, HubError> {
        entity.validate()?;
        let (entity, event) = self.store_entity(entity);
        if let Some(event) = event {
            tracing::debug!(state = %entity.state, "entity state published");
            self.publisher.publish(event).await?;
        }
        Ok(entity)
    }

    async fn publish(&self, event: Event) -> Result<(), HubError> {
        self.publisher.publish(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_domain::entity::{AttributeValue, EntityState};

    use crate::event_bus::InProcessEventBus;

    fn registry() -> (
        StateRegistry<InProcessEventBus>,
        tokio::sync::broadcast::Receiver<Event>,
    ) {
        let bus = InProcessEventBus::new(16);
        let rx = bus.subscribe();
        (StateRegistry::new(bus), rx)
    }

    fn vault_door_device() -> Device {
        Device::builder()
            .name("Vault Door")
            .manufacturer("Schlage")
            .model("<model-name>")
            .sw_version("1.0")
            .integration("lock")
            .unique_id("test")
            .build()
            .unwrap()
    }

    fn vault_door(state: EntityState) -> Entity {
        Entity::builder()
            .entity_id("lock.vault_door")
            .friendly_name("Vault Door")
            .state(state)
            .attribute("changed_by", AttributeValue::from("thumbturn"))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_register_device_and_announce_it() {
        let (registry, mut rx) = registry();

        registry.upsert_device(vault_door_device()).await.unwrap();

        let device = registry.get_device("lock", "test").unwrap();
        assert_eq!(device.name, "Vault Door");
        assert_eq!(device.sw_version.as_deref(), Some("1.0"));
        assert_eq!(rx.recv().await.unwrap().event_type, EventType::DeviceRegistered);
    }

    #[tokio::test]
    async fn should_keep_device_id_when_upserting_same_unique_id() {
        let (registry, _rx) = registry();
        let first = registry.upsert_device(vault_door_device()).await.unwrap();

        let mut renamed = vault_door_device();
        renamed.name = "Front Door".to_string();
        let second = registry.upsert_device(renamed).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(registry.list_devices().len(), 1);
        assert_eq!(registry.list_devices()[0].name, "Front Door");
    }

    #[tokio::test]
    async fn should_reject_invalid_device() {
        let (registry, _rx) = registry();
        let mut device = vault_door_device();
        device.unique_id = String::new();
        assert!(matches!(
            registry.upsert_device(device).await,
            Err(HubError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn should_publish_entity_created_on_first_upsert() {
        let (registry, mut rx) = registry();

        registry
            .upsert_entity(vault_door(EntityState::Unlocked))
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::EntityCreated);
        assert_eq!(
            registry.get_entity("lock.vault_door").unwrap().state,
            EntityState::Unlocked
        );
    }

    #[tokio::test]
    async fn should_publish_state_changed_only_when_state_differs() {
        let (registry, mut rx) = registry();
        let created = registry
            .upsert_entity(vault_door(EntityState::Unlocked))
            .await
            .unwrap();
        rx.recv().await.unwrap();

        registry
            .upsert_entity(vault_door(EntityState::Unlocked))
            .await
            .unwrap();
        assert!(rx.try_recv().is_err());

        let updated = registry
            .upsert_entity(vault_door(EntityState::Jammed))
            .await
            .unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::StateChanged);
        assert_eq!(event.data["from"], "unlocked");
        assert_eq!(event.data["to"], "jammed");
        assert_eq!(updated.id, created.id);
    }

    #[tokio::test]
    async fn should_replace_attributes_wholesale() {
        let (registry, _rx) = registry();
        registry
            .upsert_entity(vault_door(EntityState::Unlocked))
            .await
            .unwrap();

        let mut bare = vault_door(EntityState::Unavailable);
        bare.attributes.clear();
        registry.upsert_entity(bare).await.unwrap();

        let stored = registry.get_entity("lock.vault_door").unwrap();
        assert_eq!(stored.state, EntityState::Unavailable);
        assert!(stored.get_attribute("changed_by").is_none());
    }

    #[tokio::test]
    async fn should_find_entity_by_uuid() {
        let (registry, _rx) = registry();
        let created = registry
            .upsert_entity(vault_door(EntityState::Locked))
            .await
            .unwrap();

        assert_eq!(
            registry.find_entity(created.id).unwrap().entity_id,
            "lock.vault_door"
        );
        assert!(registry.find_entity(EntityId::new()).is_none());
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_entity_id() {
        let (registry, _rx) = registry();
        assert!(matches!(
            registry.get_entity("lock.missing"),
            Err(HubError::NotFound(_))
        ));
    }
}
