//! Integration port — lifecycle and service-call handling for device integrations.
//!
//! An integration bridges an external system (a vendor lock cloud, a demo
//! simulator, …) into hearth. It registers devices/entities on startup, keeps
//! them current in the background and handles service calls directed at
//! entities it owns.

use std::future::Future;

use hearth_domain::device::Device;
use hearth_domain::entity::Entity;
use hearth_domain::error::HubError;
use hearth_domain::event::Event;
use hearth_domain::id::EntityId;

/// Context provided to integrations for publishing what they know.
///
/// This is a **port** — adapters call it to register devices and push
/// entity state. The app crate provides
/// [`StateRegistry`](crate::services::state_registry::StateRegistry) as the
/// concrete implementation.
pub trait IntegrationContext: Send + Sync {
    /// Register a device (create or update by `integration`+`unique_id`).
    fn upsert_device(&self, device: Device)
    -> impl Future<Output = Result<Device, HubError>> + Send;

    /// Push an entity (create or update by `entity_id` string).
    ///
    /// Publishes `entity_created` / `state_changed` events when appropriate.
    fn upsert_entity(&self, entity: Entity)
    -> impl Future<Output = Result<Entity, HubError>> + Send;

    /// Publish a domain event to the event bus.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), HubError>> + Send;
}

/// A pluggable device integration.
///
/// The binary crate calls the lifecycle methods in order:
///
/// 1. [`setup`](Self::setup) — first fetch and registration of devices
/// 2. [`start_background`](Self::start_background) — spawn polling tasks
/// 3. (the server runs, forwarding service calls via [`handle_service_call`](Self::handle_service_call))
/// 4. [`teardown`](Self::teardown) — stop background work
pub trait Integration {
    /// Unique name identifying this integration (e.g. `"lock"`).
    fn name(&self) -> &'static str;

    /// Initial fetch and registration.
    ///
    /// A failure here means the integration could not reach its backend at
    /// all and should not be started.
    fn setup(
        &mut self,
        ctx: &impl IntegrationContext,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Start long-running background work (polling, projection).
    ///
    /// Spawns internal tasks that push updates via `ctx` and returns
    /// immediately. The default implementation is a no-op.
    fn start_background(
        &mut self,
        _ctx: impl IntegrationContext + Clone + 'static,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        async { Ok(()) }
    }

    /// Handle a service call (e.g. `lock`, `unlock`) for an entity owned by
    /// this integration.
    ///
    /// Returns the entity as the integration sees it after the call.
    fn handle_service_call(
        &self,
        entity_id: EntityId,
        service: &str,
        data: serde_json::Value,
    ) -> impl Future<Output = Result<Entity, HubError>> + Send;

    /// Called on graceful shutdown. Stops background tasks; results of
    /// in-flight remote calls are discarded.
    fn teardown(&self) -> impl Future<Output = Result<(), HubError>> + Send;
}
