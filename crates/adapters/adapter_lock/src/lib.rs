//! # hearth-adapter-lock
//!
//! Smart-lock integration for a vendor lock cloud.
//!
//! ## How it works
//!
//! 1. **Setup** runs one refresh through a [`Coordinator`]. If the cloud is
//!    unreachable the integration refuses to start. Otherwise every listed
//!    lock is registered as a device plus a `lock.<name>` entity.
//! 2. **Background**: the coordinator re-fetches the whole lock list every
//!    poll interval; a projector task re-projects each tracked lock on every
//!    update. A failed fetch clears the snapshot, so every lock reads
//!    `unavailable` until the next successful poll.
//! 3. **Service calls** (`lock` / `unlock`) go straight to the cloud. Once the
//!    cloud accepts the command a refresh is requested and the re-projected
//!    entity is returned. While polling runs, the call also waits until the
//!    projector has pushed that refresh, so the projector stays the only
//!    writer of lock entities.
//! 4. **Teardown** stops the timer and discards in-flight fetch results.
//!
//! Only locks listed at setup are tracked; a lock that later disappears from
//! the list reads `unavailable`. Locks sharing a display name get suffixed
//! entity ids (`lock.vault_door`, `lock.vault_door_2`).

mod config;
mod error;
mod projector;
mod source;
mod tracked;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use hearth_app::coordinator::{Coordinator, RefreshOutcome};
use hearth_app::ports::{Integration, IntegrationContext, LockClient};
use hearth_domain::entity::Entity;
use hearth_domain::error::{HubError, NotFoundError, ValidationError};
use hearth_domain::id::EntityId;

pub use config::LockConfig;
pub use error::LockError;
pub use source::{LockIndex, LockSource};

use tracked::TrackedLock;

/// Service name for engaging the bolt.
pub const SERVICE_LOCK: &str = "lock";
/// Service name for retracting the bolt.
pub const SERVICE_UNLOCK: &str = "unlock";

/// Lock integration over any [`LockClient`].
pub struct LockIntegration<C: LockClient + 'static> {
    config: LockConfig,
    client: Arc<C>,
    coordinator: Arc<Coordinator<LockSource<C>>>,
    locks: HashMap<EntityId, TrackedLock>,
    /// Last coordinator generation pushed by the projector, once started.
    projected: Option<watch::Receiver<u64>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<C: LockClient + 'static> LockIntegration<C> {
    /// Create the integration. Nothing is fetched until [`Integration::setup`].
    pub fn new(config: LockConfig, client: Arc<C>) -> Self {
        let coordinator = Coordinator::new(
            "lock",
            LockSource::new(Arc::clone(&client)),
            config.poll_interval(),
        );
        Self {
            config,
            client,
            coordinator,
            locks: HashMap::new(),
            projected: None,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// The coordinator driving this integration's polling.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<Coordinator<LockSource<C>>> {
        &self.coordinator
    }

    /// Number of locks registered at setup.
    #[must_use]
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    fn tracked(&self, entity_id: EntityId) -> Result<&TrackedLock, HubError> {
        self.locks.get(&entity_id).ok_or_else(|| {
            NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            }
            .into()
        })
    }

    fn current_entity(&self, lock: &TrackedLock) -> Result<Entity, HubError> {
        lock.entity(self.coordinator.data().as_deref())
    }

    /// Wait until the projector has pushed `generation` to the registry.
    ///
    /// Gives up after one poll interval or when the projector is gone.
    async fn wait_projected(&self, generation: u64) {
        let Some(projected) = &self.projected else {
            return;
        };
        let mut projected = projected.clone();
        let reached = tokio::time::timeout(self.coordinator.interval(), async move {
            projected.wait_for(|applied| *applied >= generation).await.is_ok()
        })
        .await;
        if !matches!(reached, Ok(true)) {
            tracing::warn!(generation, "lock projector did not catch up");
        }
    }
}

impl<C: LockClient + 'static> Integration for LockIntegration<C> {
    fn name(&self) -> &'static str {
        tracked::INTEGRATION
    }

    #[tracing::instrument(skip_all)]
    async fn setup(&mut self, ctx: &impl IntegrationContext) -> Result<(), HubError> {
        if self.coordinator.refresh().await != RefreshOutcome::Updated {
            let reason = self
                .coordinator
                .current()
                .last_error
                .unwrap_or_else(|| "no data".to_string());
            return Err(LockError::InitialRefresh(reason).into());
        }
        let index = self.coordinator.data().unwrap_or_default();

        let mut snapshots: Vec<_> = index.values().collect();
        snapshots.sort_by(|a, b| a.device_id.cmp(&b.device_id));

        let mut taken: HashSet<String> = self
            .locks
            .values()
            .map(|lock| lock.entity_id.clone())
            .collect();
        for snapshot in snapshots {
            let device = ctx
                .upsert_device(TrackedLock::device(snapshot, &self.config.manufacturer)?)
                .await?;

            let draft = TrackedLock {
                vendor_id: snapshot.device_id.clone(),
                device_id: device.id,
                id: EntityId::new(),
                entity_id: TrackedLock::entity_key(snapshot, &taken),
                name: snapshot.name.clone(),
            };
            let entity = ctx.upsert_entity(draft.entity(Some(index.as_ref()))?).await?;
            taken.insert(entity.entity_id.clone());

            tracing::info!(
                entity_id = %entity.entity_id,
                state = %entity.state,
                "lock registered"
            );
            self.locks.insert(
                entity.id,
                TrackedLock {
                    id: entity.id,
                    ..draft
                },
            );
        }
        Ok(())
    }

    async fn start_background(
        &mut self,
        ctx: impl IntegrationContext + Clone + 'static,
    ) -> Result<(), HubError> {
        if self.coordinator.current().generation == 0 {
            return Err(LockError::NotSetUp.into());
        }

        let mut locks: Vec<TrackedLock> = self.locks.values().cloned().collect();
        locks.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));

        let updates = self.coordinator.subscribe();
        let (applied, projected) = watch::channel(self.coordinator.current().generation);
        let projector = tokio::spawn(projector::run(updates, applied, locks, ctx));
        self.projected = Some(projected);
        let poller = self.coordinator.start();

        tracing::info!(
            interval_secs = self.coordinator.interval().as_secs(),
            locks = self.locks.len(),
            "lock polling started"
        );
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend([poller, projector]);
        Ok(())
    }

    #[tracing::instrument(skip(self, _data))]
    async fn handle_service_call(
        &self,
        entity_id: EntityId,
        service: &str,
        _data: serde_json::Value,
    ) -> Result<Entity, HubError> {
        let lock = self.tracked(entity_id)?;
        match service {
            SERVICE_LOCK => self.client.lock(&lock.vendor_id).await?,
            SERVICE_UNLOCK => self.client.unlock(&lock.vendor_id).await?,
            other => return Err(ValidationError::UnsupportedService(other.to_string()).into()),
        }
        tracing::debug!(service, "command accepted, refreshing");

        if self.coordinator.refresh().await != RefreshOutcome::Discarded {
            self.wait_projected(self.coordinator.current().generation).await;
        }
        self.current_entity(lock)
    }

    async fn teardown(&self) -> Result<(), HubError> {
        self.coordinator.shutdown();
        for task in self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
        {
            task.abort();
        }
        tracing::info!("lock integration stopped");
        Ok(())
    }
}
