//! Shared application state injected into all Axum handlers.

use serde::Serialize;

use crate::config::GatewayConfig;
use crate::relay::Relay;

/// Client-facing settings advertised on `GET /config`.
///
/// Browser clients fetch these at startup instead of hardcoding them.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClientSettings {
    /// Minimum interval between accepted pointer events, in milliseconds.
    pub throttle_interval_ms: u64,
    /// Default rendering/input scale factor.
    pub default_scale: f64,
}

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay core wiring the worker to the connection registry.
    pub relay: Relay,
    /// Capacity of each new connection's outbound queue.
    pub client_send_buffer: usize,
    /// Settings served to clients.
    pub settings: ClientSettings,
}

impl AppState {
    /// Builds the application state from configuration and a wired relay.
    #[must_use]
    pub fn new(config: &GatewayConfig, relay: Relay) -> Self {
        Self {
            relay,
            client_send_buffer: config.client_send_buffer,
            settings: ClientSettings {
                throttle_interval_ms: config.throttle_interval_ms,
                default_scale: config.default_scale,
            },
        }
    }
}
