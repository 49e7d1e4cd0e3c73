//! Virtual lock cloud.

use std::sync::{Mutex, MutexGuard, PoisonError};

use hearth_app::ports::LockClient;
use hearth_domain::error::{HubError, RemoteError};
use hearth_domain::lock::LockSnapshot;

const SERVICE: &str = "virtual lock cloud";

/// Actor reported after a command issued through the API.
const COMMAND_ACTOR: &str = "mobile device";

#[derive(Default)]
struct CloudState {
    locks: Vec<LockSnapshot>,
    offline: bool,
    failed_listings_pending: u32,
}

/// An in-memory stand-in for a vendor lock cloud.
pub struct VirtualLockCloud {
    state: Mutex<CloudState>,
}

impl Default for VirtualLockCloud {
    /// A cloud with a single unlocked `Front Door` lock.
    fn default() -> Self {
        Self::new(vec![LockSnapshot {
            device_id: "virtual-front-door".to_string(),
            name: "Front Door".to_string(),
            model_name: "VLock-1".to_string(),
            firmware_version: "1.0.0".to_string(),
            is_locked: false,
            is_jammed: false,
            last_changed_by: Some("thumbturn".to_string()),
        }])
    }
}

impl VirtualLockCloud {
    #[must_use]
    pub fn new(locks: Vec<LockSnapshot>) -> Self {
        Self {
            state: Mutex::new(CloudState {
                locks,
                ..CloudState::default()
            }),
        }
    }

    /// Make every call fail until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Make the next `count` lock listings fail. Commands are unaffected.
    pub fn fail_next_listing(&self, count: u32) {
        self.state().failed_listings_pending = count;
    }

    /// Mark a lock as jammed. Jammed locks refuse commands.
    pub fn set_jammed(&self, device_id: &str, jammed: bool) {
        if let Some(lock) = self.state().locks.iter_mut().find(|l| l.device_id == device_id) {
            lock.is_jammed = jammed;
        }
    }

    /// Drop a lock from the account, as if it went out of range.
    pub fn remove(&self, device_id: &str) -> Option<LockSnapshot> {
        let mut state = self.state();
        let index = state.locks.iter().position(|l| l.device_id == device_id)?;
        Some(state.locks.remove(index))
    }

    #[must_use]
    pub fn snapshot(&self, device_id: &str) -> Option<LockSnapshot> {
        self.state()
            .locks
            .iter()
            .find(|l| l.device_id == device_id)
            .cloned()
    }

    fn state(&self) -> MutexGuard<'_, CloudState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_reachable(state: &CloudState) -> Result<(), HubError> {
        if state.offline {
            return Err(RemoteError::new(SERVICE, "cloud unreachable").into());
        }
        Ok(())
    }

    fn command(&self, device_id: &str, locked: bool) -> Result<(), HubError> {
        let mut state = self.state();
        Self::check_reachable(&state)?;
        let lock = state
            .locks
            .iter_mut()
            .find(|l| l.device_id == device_id)
            .ok_or_else(|| RemoteError::new(SERVICE, format!("unknown device `{device_id}`")))?;
        if lock.is_jammed {
            return Err(RemoteError::new(SERVICE, format!("`{device_id}` is jammed")).into());
        }
        lock.is_locked = locked;
        lock.last_changed_by = Some(COMMAND_ACTOR.to_string());
        tracing::debug!(device_id, locked, "virtual lock moved");
        Ok(())
    }
}

impl LockClient for VirtualLockCloud {
    async fn locks(&self) -> Result<Vec<LockSnapshot>, HubError> {
        let mut state = self.state();
        Self::check_reachable(&state)?;
        if state.failed_listings_pending > 0 {
            state.failed_listings_pending -= 1;
            return Err(RemoteError::new(SERVICE, "request timed out").into());
        }
        Ok(state.locks.clone())
    }

    async fn lock(&self, device_id: &str) -> Result<(), HubError> {
        self.command(device_id, true)
    }

    async fn unlock(&self, device_id: &str) -> Result<(), HubError> {
        self.command(device_id, false)
    }
}
