//! Domain layer: wire types, connection registry, and snapshot bus.
//!
//! This module contains the gateway-side model: client commands, worker
//! snapshots, connection identity, the registry used for fan-out broadcast,
//! and the bus carrying parsed snapshots from the worker adapter to the
//! relay core.

pub mod command;
pub mod connection_id;
pub mod connection_registry;
pub mod snapshot;
pub mod snapshot_bus;

pub use command::Command;
pub use connection_id::ConnectionId;
pub use connection_registry::{BroadcastOutcome, ConnectionRegistry, Frame, HANDSHAKE_ACK};
pub use snapshot::{Actuator, PinId, Snapshot};
pub use snapshot_bus::SnapshotBus;
