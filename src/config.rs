//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Nothing is configured on the command
//! line.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::GatewayError;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host address to bind the server to.
    pub host: IpAddr,

    /// TCP port to listen on.
    pub port: u16,

    /// Worker command line: executable followed by its arguments.
    /// Split on whitespace; quoting is not supported.
    pub worker_command: Vec<String>,

    /// Directory of static client assets served at the root path.
    pub static_dir: PathBuf,

    /// Minimum interval between accepted client pointer events, in
    /// milliseconds. Advertised to clients via `GET /config`.
    pub throttle_interval_ms: u64,

    /// Default rendering/input scale factor. Advertised to clients via
    /// `GET /config`.
    pub default_scale: f64,

    /// Capacity of the snapshot broadcast ring buffer.
    pub snapshot_bus_capacity: usize,

    /// Capacity of the bounded queue in front of the worker's stdin.
    pub command_buffer: usize,

    /// Capacity of each client's bounded outbound queue.
    pub client_send_buffer: usize,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidListenHost`] if `LISTEN_HOST` cannot
    /// be parsed as an IP address, or [`GatewayError::WorkerCommandEmpty`]
    /// if `WORKER_COMMAND` is set to an empty string.
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();

        let host_raw = std::env::var("LISTEN_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let host: IpAddr = host_raw
            .parse()
            .map_err(|_| GatewayError::InvalidListenHost(host_raw))?;

        let port = parse_env("LISTEN_PORT", 8080);

        let worker_raw =
            std::env::var("WORKER_COMMAND").unwrap_or_else(|_| "python3 process.py".to_string());
        let worker_command: Vec<String> =
            worker_raw.split_whitespace().map(str::to_string).collect();
        if worker_command.is_empty() {
            return Err(GatewayError::WorkerCommandEmpty);
        }

        let static_dir =
            PathBuf::from(std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()));

        let throttle_interval_ms = parse_env("THROTTLE_INTERVAL_MS", 100);
        let default_scale = parse_env("DEFAULT_SCALE", 0.3);

        let snapshot_bus_capacity = parse_env("SNAPSHOT_BUS_CAPACITY", 64);
        let command_buffer = parse_env("COMMAND_BUFFER", 64);
        let client_send_buffer = parse_env("CLIENT_SEND_BUFFER", 32);

        Ok(Self {
            host,
            port,
            worker_command,
            static_dir,
            throttle_interval_ms,
            default_scale,
            snapshot_bus_capacity,
            command_buffer,
            client_send_buffer,
        })
    }

    /// Returns the socket address to bind the server to.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_combines_host_and_port() {
        let config = GatewayConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 9999,
            worker_command: vec!["true".to_string()],
            static_dir: PathBuf::from("public"),
            throttle_interval_ms: 100,
            default_scale: 0.3,
            snapshot_bus_capacity: 64,
            command_buffer: 64,
            client_send_buffer: 32,
        };
        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:9999");
    }

    #[test]
    fn parse_env_falls_back_on_missing() {
        assert_eq!(parse_env("TACTILE_GATEWAY_UNSET_KEY", 42u64), 42);
    }
}
