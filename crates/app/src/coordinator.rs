//! Polling coordinator — keeps one snapshot of a remote [`DataSource`] fresh.
//!
//! The coordinator owns the last fetched snapshot and publishes every
//! replacement through a [`watch`] channel, so observers always read either
//! the previous or the new [`CoordinatorUpdate`] as a whole.
//!
//! Refreshes are serialised: the timer loop awaits each refresh before
//! waiting for the next tick, and manual [`Coordinator::refresh`] calls queue
//! behind an async mutex. A failed fetch replaces the snapshot with `None`
//! (never merges with the previous one) and records the error for observers.
//! After [`Coordinator::shutdown`], results of in-flight fetches are dropped.

use std::error::Error as _;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use hearth_domain::error::HubError;
use hearth_domain::time::{Timestamp, now};

use crate::ports::DataSource;

/// Default polling period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// What observers see after each refresh.
#[derive(Debug)]
pub struct CoordinatorUpdate<T> {
    /// Latest snapshot, `None` before the first refresh or after a failure.
    pub data: Option<Arc<T>>,
    /// Rendered error of the last refresh, if it failed.
    pub last_error: Option<String>,
    /// Number of completed (non-discarded) refreshes.
    pub generation: u64,
    pub refreshed_at: Option<Timestamp>,
}

impl<T> Clone for CoordinatorUpdate<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            last_error: self.last_error.clone(),
            generation: self.generation,
            refreshed_at: self.refreshed_at,
        }
    }
}

impl<T> Default for CoordinatorUpdate<T> {
    fn default() -> Self {
        Self {
            data: None,
            last_error: None,
            generation: 0,
            refreshed_at: None,
        }
    }
}

impl<T> CoordinatorUpdate<T> {
    /// Whether the last refresh produced data.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.data.is_some()
    }
}

/// How a single refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New data stored.
    Updated,
    /// Fetch failed; data cleared and error recorded.
    Failed,
    /// The coordinator was shut down; nothing stored.
    Discarded,
}

/// Periodically refreshes a snapshot from a [`DataSource`].
pub struct Coordinator<S: DataSource> {
    name: String,
    source: S,
    interval: Duration,
    refresh_lock: Mutex<()>,
    updates: watch::Sender<CoordinatorUpdate<S::Data>>,
    shutdown: watch::Sender<bool>,
}

impl<S: DataSource> Coordinator<S> {
    /// Create a coordinator polling `source` every `interval`.
    ///
    /// Nothing is fetched until [`refresh`](Self::refresh) or
    /// [`start`](Self::start) is called.
    #[must_use]
    pub fn new(name: impl Into<String>, source: S, interval: Duration) -> Arc<Self> {
        let (updates, _) = watch::channel(CoordinatorUpdate::default());
        let (shutdown, _) = watch::channel(false);
        Arc::new(Self {
            name: name.into(),
            source,
            interval,
            refresh_lock: Mutex::new(()),
            updates,
            shutdown,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Subscribe to snapshot replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorUpdate<S::Data>> {
        self.updates.subscribe()
    }

    /// The current update, cloned out of the channel.
    #[must_use]
    pub fn current(&self) -> CoordinatorUpdate<S::Data> {
        self.updates.borrow().clone()
    }

    /// Shortcut for the current snapshot.
    #[must_use]
    pub fn data(&self) -> Option<Arc<S::Data>> {
        self.updates.borrow().data.clone()
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Fetch a fresh snapshot and publish it.
    ///
    /// Waits for any refresh already in flight. Fetch errors are logged and
    /// recorded in the update, never returned.
    #[tracing::instrument(skip(self), fields(coordinator = %self.name))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let _guard = self.refresh_lock.lock().await;
        if self.is_shut_down() {
            return RefreshOutcome::Discarded;
        }

        let result = self.source.fetch().await;

        if self.is_shut_down() {
            tracing::debug!("coordinator shut down during fetch, discarding result");
            return RefreshOutcome::Discarded;
        }

        let (data, last_error, outcome) = match result {
            Ok(data) => (Some(Arc::new(data)), None, RefreshOutcome::Updated),
            Err(err) => {
                let rendered = render_error(&err);
                tracing::warn!(error = %rendered, "refresh failed, marking data unavailable");
                (None, Some(rendered), RefreshOutcome::Failed)
            }
        };

        self.updates.send_modify(|update| {
            update.data = data;
            update.last_error = last_error;
            update.generation += 1;
            update.refreshed_at = Some(now());
        });
        outcome
    }

    /// Spawn the timer loop. The first tick fires one `interval` from now.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.run().await })
    }

    /// Stop the timer loop and discard any in-flight fetch result.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
        tracing::debug!(coordinator = %self.name, "coordinator shut down");
    }

    async fn run(&self) {
        let mut shutdown = self.shutdown.subscribe();
        if *shutdown.borrow_and_update() {
            return;
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            coordinator = %self.name,
            interval_secs = self.interval.as_secs(),
            "polling started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh().await;
                }
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!(coordinator = %self.name, "polling stopped");
    }
}

/// Render an error with its whole source chain, `outer: inner: root`.
fn render_error(err: &HubError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(rendered, ": {cause}");
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hearth_domain::error::RemoteError;

    /// Scripted source: pops one response per fetch, sleeping `delay` first.
    struct ScriptedSource {
        responses: StdMutex<VecDeque<Result<u32, HubError>>>,
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<u32, HubError>>, delay: Duration) -> Self {
            Self {
                responses: StdMutex::new(responses.into()),
                delay,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    impl DataSource for ScriptedSource {
        type Data = u32;

        async fn fetch(&self) -> Result<u32, HubError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RemoteError::new("test", "script exhausted").into()))
        }
    }

    fn remote_failure() -> Result<u32, HubError> {
        Err(RemoteError::new("test", "connection reset").into())
    }

    #[tokio::test]
    async fn should_start_without_data() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![], Duration::ZERO),
            DEFAULT_INTERVAL,
        );
        let current = coordinator.current();
        assert!(!current.is_available());
        assert_eq!(current.generation, 0);
    }

    #[tokio::test]
    async fn should_store_fetched_snapshot() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![Ok(7)], Duration::ZERO),
            DEFAULT_INTERVAL,
        );

        assert_eq!(coordinator.refresh().await, RefreshOutcome::Updated);
        assert_eq!(coordinator.data().as_deref(), Some(&7));
        assert_eq!(coordinator.current().generation, 1);
        assert!(coordinator.current().refreshed_at.is_some());
    }

    #[tokio::test]
    async fn should_clear_snapshot_instead_of_keeping_stale_data_on_failure() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![Ok(7), remote_failure()], Duration::ZERO),
            DEFAULT_INTERVAL,
        );
        coordinator.refresh().await;

        assert_eq!(coordinator.refresh().await, RefreshOutcome::Failed);
        let current = coordinator.current();
        assert!(current.data.is_none());
        assert_eq!(
            current.last_error.as_deref(),
            Some("remote call failed: test: connection reset")
        );
    }

    #[tokio::test]
    async fn should_clear_error_after_successful_refresh() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![remote_failure(), Ok(3)], Duration::ZERO),
            DEFAULT_INTERVAL,
        );
        coordinator.refresh().await;
        coordinator.refresh().await;

        let current = coordinator.current();
        assert_eq!(current.data.as_deref(), Some(&3));
        assert!(current.last_error.is_none());
        assert_eq!(current.generation, 2);
    }

    #[tokio::test]
    async fn should_notify_subscribers_on_each_replacement() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![Ok(1)], Duration::ZERO),
            DEFAULT_INTERVAL,
        );
        let mut rx = coordinator.subscribe();

        coordinator.refresh().await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().data.as_deref(), Some(&1));
    }

    #[tokio::test(start_paused = true)]
    async fn should_never_run_two_fetches_at_once() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![Ok(1), Ok(2)], Duration::from_secs(5)),
            DEFAULT_INTERVAL,
        );

        let (first, second) = tokio::join!(coordinator.refresh(), coordinator.refresh());

        assert_eq!(first, RefreshOutcome::Updated);
        assert_eq!(second, RefreshOutcome::Updated);
        assert_eq!(coordinator.source.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.current().generation, 2);
        assert_eq!(coordinator.data().as_deref(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn should_refresh_once_per_interval() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![Ok(1), Ok(2), Ok(3)], Duration::ZERO),
            DEFAULT_INTERVAL,
        );
        let handle = coordinator.start();

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(coordinator.source.calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(coordinator.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.data().as_deref(), Some(&1));

        tokio::time::sleep(DEFAULT_INTERVAL).await;
        assert_eq!(coordinator.source.calls.load(Ordering::SeqCst), 2);

        coordinator.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_polling_after_failures() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![remote_failure(), remote_failure(), Ok(9)], Duration::ZERO),
            DEFAULT_INTERVAL,
        );
        let handle = coordinator.start();

        tokio::time::sleep(DEFAULT_INTERVAL * 3 + Duration::from_secs(1)).await;

        assert_eq!(coordinator.source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(coordinator.data().as_deref(), Some(&9));

        coordinator.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn should_discard_in_flight_result_after_shutdown() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![Ok(1)], Duration::from_secs(10)),
            DEFAULT_INTERVAL,
        );

        let pending = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.refresh().await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        coordinator.shutdown();

        assert_eq!(pending.await.unwrap(), RefreshOutcome::Discarded);
        assert!(coordinator.data().is_none());
        assert_eq!(coordinator.current().generation, 0);
    }

    #[tokio::test]
    async fn should_refuse_refresh_after_shutdown() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![Ok(1)], Duration::ZERO),
            DEFAULT_INTERVAL,
        );
        coordinator.shutdown();

        assert_eq!(coordinator.refresh().await, RefreshOutcome::Discarded);
        assert_eq!(coordinator.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_stop_loop_when_shut_down_before_start() {
        let coordinator = Coordinator::new(
            "test",
            ScriptedSource::new(vec![], Duration::ZERO),
            DEFAULT_INTERVAL,
        );
        coordinator.shutdown();
        coordinator.start().await.unwrap();
    }
}
