//! # hearthd — hearth daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Construct the clients (virtual lock cloud, virtual music server)
//! - Set up the lock integration against the state registry and start polling
//! - Build the axum router, injecting the integration and the search service
//! - Bind to a TCP port and serve until Ctrl-C, then tear integrations down
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hearth_adapter_http_axum::router;
use hearth_adapter_http_axum::state::AppState;
use hearth_adapter_lock::LockIntegration;
use hearth_adapter_virtual::{VirtualLockCloud, VirtualMusicServer};
use hearth_app::event_bus::InProcessEventBus;
use hearth_app::ports::Integration;
use hearth_app::services::search_service::SearchService;
use hearth_app::services::state_registry::StateRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Event bus + presentation state
    let events = InProcessEventBus::new(256);
    let registry = StateRegistry::new(events.clone());

    // Lock integration
    let cloud = Arc::new(VirtualLockCloud::default());
    let mut locks = LockIntegration::new(config.lock.clone(), cloud);
    if config.integrations.lock_enabled {
        match locks.setup(&registry).await {
            Ok(()) => locks.start_background(registry.clone()).await?,
            Err(err) => tracing::error!(%err, "lock integration setup failed, continuing without locks"),
        }
    }
    let locks = Arc::new(locks);

    // Media search
    let search = SearchService::new(VirtualMusicServer::default());

    // HTTP
    let state = AppState::new(Arc::clone(&locks), registry, search, events);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "hearthd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    locks.teardown().await?;
    tracing::info!("hearthd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c, serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
