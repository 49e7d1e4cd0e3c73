//! Background task turning coordinator updates into entity updates.

use tokio::sync::watch;

use hearth_app::coordinator::CoordinatorUpdate;
use hearth_app::ports::IntegrationContext;
use hearth_domain::event::{Event, EventType};

use crate::source::LockIndex;
use crate::tracked::{INTEGRATION, TrackedLock};

/// Re-project every tracked lock on each coordinator update.
///
/// This task is the only writer of lock entities once background polling
/// runs. After each update is pushed, its generation is sent on `applied`.
///
/// Ends when the coordinator is dropped.
pub(crate) async fn run<C: IntegrationContext>(
    mut updates: watch::Receiver<CoordinatorUpdate<LockIndex>>,
    applied: watch::Sender<u64>,
    locks: Vec<TrackedLock>,
    ctx: C,
) {
    while updates.changed().await.is_ok() {
        let update = updates.borrow_and_update().clone();

        if let Some(error) = &update.last_error {
            let event = Event::new(
                EventType::RefreshFailed,
                None,
                serde_json::json!({ "integration": INTEGRATION, "error": error }),
            );
            if let Err(err) = ctx.publish(event).await {
                tracing::warn!(%err, "failed to publish refresh failure");
            }
        }

        for lock in &locks {
            let result = match lock.entity(update.data.as_deref()) {
                Ok(entity) => ctx.upsert_entity(entity).await.map(|_| ()),
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                tracing::warn!(%err, entity_id = %lock.entity_id, "failed to push lock state");
            }
        }
        applied.send_replace(update.generation);
    }
    tracing::debug!("lock projector stopped");
}
