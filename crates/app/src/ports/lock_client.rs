//! Lock client port — the vendor cloud behind smart locks.

use std::future::Future;
use std::sync::Arc;

use hearth_domain::error::HubError;
use hearth_domain::lock::LockSnapshot;

/// Access to a vendor's lock cloud.
///
/// Commands are fire-and-confirm: `Ok(())` means the vendor accepted the
/// request, not that the next [`locks`](Self::locks) call already reflects it.
pub trait LockClient: Send + Sync {
    /// List every lock visible to the account. A lock missing from the list
    /// is unreachable.
    fn locks(&self) -> impl Future<Output = Result<Vec<LockSnapshot>, HubError>> + Send;

    /// Ask the lock identified by `device_id` to lock.
    fn lock(&self, device_id: &str) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Ask the lock identified by `device_id` to unlock.
    fn unlock(&self, device_id: &str) -> impl Future<Output = Result<(), HubError>> + Send;
}

impl<T: LockClient> LockClient for Arc<T> {
    fn locks(&self) -> impl Future<Output = Result<Vec<LockSnapshot>, HubError>> + Send {
        (**self).locks()
    }

    fn lock(&self, device_id: &str) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).lock(device_id)
    }

    fn unlock(&self, device_id: &str) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).unlock(device_id)
    }
}
