//! # hearth-domain
//!
//! Pure domain model for the hearth home automation hub.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (physical things registered by an integration)
//! - Define **Entities** (state holders with identity, e.g. `lock.vault_door`)
//! - Define **Events** (state-change and failure records)
//! - Define **Lock snapshots** and the pure projection onto [`lock::LockState`]
//! - Define **Media search** requests, results, and their compact rendering
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod entity;
pub mod event;
pub mod lock;
pub mod media;
