//! Coordinator data source over a [`LockClient`].

use std::collections::HashMap;
use std::sync::Arc;

use hearth_app::ports::{DataSource, LockClient};
use hearth_domain::error::HubError;
use hearth_domain::lock::LockSnapshot;

/// Every lock returned by one `locks()` call, keyed by vendor device id.
pub type LockIndex = HashMap<String, LockSnapshot>;

/// Fetches the full lock list from the vendor cloud on each refresh.
pub struct LockSource<C> {
    client: Arc<C>,
}

impl<C> LockSource<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

impl<C: LockClient + 'static> DataSource for LockSource<C> {
    type Data = LockIndex;

    async fn fetch(&self) -> Result<LockIndex, HubError> {
        let locks = self.client.locks().await?;
        tracing::debug!(count = locks.len(), "lock list fetched");
        Ok(locks
            .into_iter()
            .map(|lock| (lock.device_id.clone(), lock))
            .collect())
    }
}
