//! WebSocket layer: upgrade handling and the per-connection loop.
//!
//! The endpoint at `/ws` carries one JSON document per text frame in both
//! directions: commands inbound, the handshake acknowledgment and snapshot
//! broadcasts outbound.

pub mod connection;
pub mod handler;
