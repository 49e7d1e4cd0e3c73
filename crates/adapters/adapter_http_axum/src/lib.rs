//! # hearth-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over the state registry
//!   (`/api/entities`, `/api/devices`)
//! - Forward **service calls** to the lock integration and the search
//!   service (`/api/services/lock/{service}`, `/api/services/media/search`)
//! - Stream domain events as **server-sent events** (`/api/events/stream`)
//! - Map [`HubError`](hearth_domain::error::HubError) into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `hearth-app` (for port traits and services) and `hearth-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
