//! # hearth-adapter-virtual
//!
//! Simulated backends for testing and demonstration.
//!
//! | Backend | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualLockCloud`] | `LockClient` | One demo lock by default; commands flip `is_locked` |
//! | [`VirtualMusicServer`] | `MusicClient` | Small fixed library searched by substring |
//!
//! Both expose knobs (going offline, jamming a lock, dropping a device) so
//! failure paths can be exercised without a vendor account.
//!
//! ## Dependency rule
//!
//! Depends on `hearth-app` (port traits) and `hearth-domain` only.

mod lock_cloud;
mod music_server;

pub use lock_cloud::VirtualLockCloud;
pub use music_server::VirtualMusicServer;
