//! Entity — the central state-holding concept in hearth.
//!
//! An entity represents a single observable/controllable aspect of a device
//! (e.g. a lock's locked/unlocked state) and carries auxiliary attributes
//! such as `changed_by`.

mod attribute_value;
mod state;

pub use attribute_value::AttributeValue;
pub use state::EntityState;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HubError, ValidationError};
use crate::id::{DeviceId, EntityId};
use crate::time::{Timestamp, now};

/// Attribute map attached to an entity, ordered by key.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A state holder exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub device_id: DeviceId,
    /// Human-readable stable key, e.g. `lock.vault_door`.
    pub entity_id: String,
    pub friendly_name: String,
    pub state: EntityState,
    pub attributes: Attributes,
    /// Last time `state` took a different value.
    pub last_changed: Timestamp,
    /// Last time the state or any attribute was written.
    pub last_updated: Timestamp,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when `entity_id` or `friendly_name`
    /// is empty.
    pub fn validate(&self) -> Result<(), HubError> {
        if self.entity_id.is_empty() {
            return Err(ValidationError::EmptyEntityId.into());
        }
        if self.friendly_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Write a new state. `last_changed` only moves when the state differs.
    pub fn update_state(&mut self, state: EntityState, at: Timestamp) {
        if self.state != state {
            self.state = state;
            self.last_changed = at;
        }
        self.last_updated = at;
    }

    /// Swap the whole attribute map; keys missing from `attributes` disappear.
    pub fn replace_attributes(&mut self, attributes: Attributes, at: Timestamp) {
        self.attributes = attributes;
        self.last_updated = at;
    }

    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

/// Turn a display name into an entity-id object part.
///
/// `"Vault Door"` becomes `"vault_door"`; runs of anything that is not an
/// ASCII letter or digit collapse into a single underscore.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    id: Option<EntityId>,
    device_id: Option<DeviceId>,
    entity_id: Option<String>,
    friendly_name: Option<String>,
    state: EntityState,
    attributes: Attributes,
}

impl EntityBuilder {
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: EntityState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] if `entity_id` or `friendly_name`
    /// is missing or empty.
    pub fn build(self) -> Result<Entity, HubError> {
        let ts = now();
        let entity = Entity {
            id: self.id.unwrap_or_default(),
            device_id: self.device_id.unwrap_or_default(),
            entity_id: self.entity_id.unwrap_or_default(),
            friendly_name: self.friendly_name.unwrap_or_default(),
            state: self.state,
            attributes: self.attributes,
            last_changed: ts,
            last_updated: ts,
        };
        entity.validate()?;
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn vault_door() -> Entity {
        Entity::builder()
            .entity_id("lock.vault_door")
            .friendly_name("Vault Door")
            .state(EntityState::Unlocked)
            .attribute("changed_by", AttributeValue::String("thumbturn".into()))
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_entity_with_attributes() {
        let entity = vault_door();
        assert_eq!(entity.entity_id, "lock.vault_door");
        assert_eq!(
            entity.get_attribute("changed_by"),
            Some(&AttributeValue::String("thumbturn".into()))
        );
    }

    #[test]
    fn should_reject_entity_without_entity_id() {
        let result = Entity::builder().friendly_name("Vault Door").build();
        assert!(matches!(
            result,
            Err(HubError::Validation(ValidationError::EmptyEntityId))
        ));
    }

    #[test]
    fn should_move_last_changed_only_when_state_differs() {
        let mut entity = vault_door();
        let first = entity.last_changed;

        let later = first + Duration::seconds(30);
        entity.update_state(EntityState::Unlocked, later);
        assert_eq!(entity.last_changed, first);
        assert_eq!(entity.last_updated, later);

        let even_later = later + Duration::seconds(30);
        entity.update_state(EntityState::Jammed, even_later);
        assert_eq!(entity.last_changed, even_later);
    }

    #[test]
    fn should_drop_missing_keys_when_replacing_attributes() {
        let mut entity = vault_door();
        entity.replace_attributes(Attributes::new(), now());
        assert!(entity.get_attribute("changed_by").is_none());
    }

    #[test]
    fn should_slugify_display_names() {
        assert_eq!(slugify("Vault Door"), "vault_door");
        assert_eq!(slugify("  Back -- Gate! "), "back_gate");
        assert_eq!(slugify("Garage2"), "garage2");
    }
}
