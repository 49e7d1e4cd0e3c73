//! # hearth-app
//!
//! Application layer — use-cases, **port definitions** (traits) and the
//! in-process machinery that does not need IO.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `LockClient` — list locks, lock, unlock (vendor cloud)
//!   - `MusicClient` — free-text media search (music server)
//!   - `DataSource` — anything a [`coordinator::Coordinator`] can poll
//!   - `EventPublisher` — fan-out of domain events
//!   - `Integration` / `IntegrationContext` — integration lifecycle
//! - Provide the **polling coordinator** that keeps a snapshot fresh
//! - Provide the **state registry**, the in-memory presentation sink
//! - Provide the **search service** wrapping a `MusicClient`
//!
//! ## Dependency rule
//! Depends on `hearth-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod coordinator;
pub mod event_bus;
pub mod ports;
pub mod services;
