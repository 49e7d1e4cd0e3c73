//! Event — an immutable record of something that happened.
//!
//! Events are produced when devices are registered, entity state changes,
//! services are called, or a coordinator refresh fails.

use serde::{Deserialize, Serialize};

use crate::id::{EntityId, EventId};
use crate::time::{Timestamp, now};

/// What kind of thing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StateChanged,
    EntityCreated,
    DeviceRegistered,
    RefreshFailed,
    ServiceCalled,
}

impl EventType {
    /// The wire name, as used in serialized events.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StateChanged => "state_changed",
            Self::EntityCreated => "entity_created",
            Self::DeviceRegistered => "device_registered",
            Self::RefreshFailed => "refresh_failed",
            Self::ServiceCalled => "service_called",
        }
    }
}

/// An immutable event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub entity_id: Option<EntityId>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(
        event_type: EventType,
        entity_id: Option<EntityId>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            entity_id,
            data,
            timestamp: now(),
        }
    }
}
