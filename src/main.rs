//! tactile-gateway server entry point.
//!
//! Starts the Axum server with the WebSocket relay, spawns the worker
//! process, and terminates it on shutdown.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tactile_gateway::api;
use tactile_gateway::app_state::AppState;
use tactile_gateway::config::GatewayConfig;
use tactile_gateway::domain::ConnectionRegistry;
use tactile_gateway::relay::Relay;
use tactile_gateway::worker::WorkerAdapter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr(), "starting tactile-gateway");

    // Spawn the worker process; failure here is fatal, the server does not
    // come up without its control engine.
    let worker = WorkerAdapter::spawn(&config)?;

    // Wire the relay core
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = Relay::new(worker.clone(), registry);
    let _pump = relay.spawn_snapshot_pump();

    // Build application state and router
    let app_state = AppState::new(&config, relay);
    let app = api::build_router(app_state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    tracing::info!(addr = %config.listen_addr(), "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(worker))
        .await?;

    Ok(())
}

/// Resolves on ctrl-c and terminates the worker process before the server
/// stops accepting connections.
async fn shutdown_signal(worker: WorkerAdapter) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
    worker.shutdown();
}
