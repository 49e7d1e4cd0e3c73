//! A lock known to the integration and the records built from it.

use std::collections::HashSet;

use hearth_domain::device::Device;
use hearth_domain::entity::{Entity, slugify};
use hearth_domain::error::HubError;
use hearth_domain::id::{DeviceId, EntityId};
use hearth_domain::lock::{LockSnapshot, project};

use crate::source::LockIndex;

/// Integration name, used as the device registry namespace.
pub(crate) const INTEGRATION: &str = "lock";

/// Identity of a lock registered during setup.
#[derive(Debug, Clone)]
pub(crate) struct TrackedLock {
    /// Vendor device id, the key into [`LockIndex`].
    pub vendor_id: String,
    pub device_id: DeviceId,
    pub id: EntityId,
    pub entity_id: String,
    pub name: String,
}

impl TrackedLock {
    /// Entity-id string for a lock, e.g. `lock.vault_door`.
    ///
    /// Keys already in `taken` get a numeric suffix (`lock.vault_door_2`),
    /// so locks sharing a display name stay distinct entities.
    pub fn entity_key(snapshot: &LockSnapshot, taken: &HashSet<String>) -> String {
        let slug = slugify(&snapshot.name);
        let base = if slug.is_empty() {
            format!("{INTEGRATION}.{}", slugify(&snapshot.device_id))
        } else {
            format!("{INTEGRATION}.{slug}")
        };
        if !taken.contains(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or(base)
    }

    /// Registry record for the physical lock.
    pub fn device(snapshot: &LockSnapshot, manufacturer: &str) -> Result<Device, HubError> {
        Device::builder()
            .name(&snapshot.name)
            .manufacturer(manufacturer)
            .model(&snapshot.model_name)
            .sw_version(&snapshot.firmware_version)
            .integration(INTEGRATION)
            .unique_id(&snapshot.device_id)
            .build()
    }

    /// Entity reflecting this lock's slot in `index`.
    ///
    /// A missing index (failed refresh) or a missing slot (lock no longer
    /// listed) both project to `unavailable`.
    pub fn entity(&self, index: Option<&LockIndex>) -> Result<Entity, HubError> {
        let projection = project(index.and_then(|locks| locks.get(&self.vendor_id)));
        Entity::builder()
            .id(self.id)
            .device_id(self.device_id)
            .entity_id(&self.entity_id)
            .friendly_name(&self.name)
            .state(projection.state.into())
            .attributes(projection.attributes)
            .build()
    }
}
