//! # tactile-gateway
//!
//! WebSocket gateway relaying UI clients to a real-time actuator control
//! engine. Clients stream JSON commands in; the engine — an external worker
//! process speaking newline-delimited JSON over stdio — streams actuator
//! state snapshots out, fanned out to every connected client.
//!
//! The relay is best-effort by design: latest-state-wins telemetry, bounded
//! queues everywhere, drop-and-log on pressure. One bad peer never affects
//! another; only a worker spawn failure is fatal.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, static assets)
//!     │
//!     ├── WS Handler (ws/)
//!     ├── System routes + static files (api/)
//!     │
//!     ├── Relay (relay/)
//!     │     ├── ConnectionRegistry (domain/)   ← fan-out broadcast
//!     │     └── SnapshotBus (domain/)          ← parsed worker output
//!     │
//!     └── WorkerAdapter (worker/)
//!           └── one external control process (stdio, line-framed JSON)
//! ```

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod relay;
pub mod worker;
pub mod ws;
