//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod data_source;
pub mod event_bus;
pub mod integration;
pub mod lock_client;
pub mod music_client;

pub use data_source::DataSource;
pub use event_bus::EventPublisher;
pub use integration::{Integration, IntegrationContext};
pub use lock_client::LockClient;
pub use music_client::MusicClient;
