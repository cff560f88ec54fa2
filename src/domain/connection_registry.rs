//! Concurrent registry of open client connections.
//!
//! [`ConnectionRegistry`] stores the outbound queue of every open WebSocket
//! connection in a `RwLock<HashMap>`. Broadcast iterates a stable snapshot of
//! the membership taken under a short read lock, so a connection closing (and
//! removing itself) mid-broadcast never invalidates the pass.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::ConnectionId;

/// One outbound text frame, serialized once and shared across all receivers.
pub type Frame = Arc<str>;

/// Literal acknowledgment text sent to every newly registered connection.
pub const HANDSHAKE_ACK: &str = "connected";

/// Result of one broadcast pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Connections whose queue accepted the frame.
    pub delivered: usize,
    /// Connections whose queue was full; the frame was dropped for them.
    pub dropped: usize,
    /// Connections found closed and removed after the pass.
    pub removed: usize,
}

/// Registry of all currently open client connections.
///
/// Each entry maps a [`ConnectionId`] to the bounded outbound queue drained
/// by that connection's writer task. All sends are non-blocking: a stalled
/// client loses frames instead of backing up the relay.
///
/// # Concurrency
///
/// - `add`/`remove` take the write lock briefly; `broadcast` clones the
///   membership under the read lock and sends outside it.
/// - Removal discovered during a broadcast pass is deferred until the pass
///   completes, so every live member is attempted exactly once.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, mpsc::Sender<Frame>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly opened connection and queues the handshake
    /// acknowledgment to it (and only it).
    ///
    /// Always succeeds; the returned id is the connection's handle for the
    /// rest of its lifetime. The ack occupies the first slot of the outbound
    /// queue, so it reaches the client before any broadcast frame.
    pub async fn add(&self, sender: mpsc::Sender<Frame>) -> ConnectionId {
        let id = ConnectionId::new();
        if let Err(e) = sender.try_send(Frame::from(HANDSHAKE_ACK)) {
            tracing::warn!(connection = %id, error = %e, "failed to queue handshake ack");
        }
        self.connections.write().await.insert(id, sender);
        tracing::info!(connection = %id, "client connected");
        id
    }

    /// Removes a connection if present. Idempotent.
    ///
    /// Returns `true` if the connection was still registered.
    pub async fn remove(&self, id: ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(connection = %id, "client disconnected");
        }
        removed
    }

    /// Sends one already-serialized frame to every registered connection.
    ///
    /// The payload is shared (`Arc<str>`), so all N deliveries carry
    /// byte-identical text. A failure on one connection is isolated: a full
    /// queue drops the frame for that peer only, a closed queue schedules the
    /// peer for removal after the pass. Neither outcome affects delivery to
    /// the remaining peers.
    pub async fn broadcast(&self, frame: Frame) -> BroadcastOutcome {
        let members: Vec<(ConnectionId, mpsc::Sender<Frame>)> = self
            .connections
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut outcome = BroadcastOutcome::default();
        let mut stale = Vec::new();
        for (id, tx) in members {
            match tx.try_send(Arc::clone(&frame)) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    outcome.dropped += 1;
                    tracing::debug!(connection = %id, "outbound queue full, frame dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    stale.push(id);
                }
            }
        }

        for id in stale {
            if self.remove(id).await {
                outcome.removed += 1;
                tracing::warn!(connection = %id, "removed closed connection during broadcast");
            }
        }
        outcome
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connections are registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_queues_handshake_ack() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(4);
        let _id = registry.add(tx).await;

        let Some(frame) = rx.recv().await else {
            panic!("expected handshake ack");
        };
        assert_eq!(&*frame, HANDSHAKE_ACK);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connection_byte_identical() {
        let registry = ConnectionRegistry::new();
        let mut receivers = Vec::new();
        for _ in 0..5 {
            let (tx, mut rx) = mpsc::channel(4);
            registry.add(tx).await;
            // Drain the ack so only broadcast frames remain.
            let _ = rx.recv().await;
            receivers.push(rx);
        }

        let outcome = registry.broadcast(Frame::from("[1,2,3]")).await;
        assert_eq!(outcome.delivered, 5);
        assert_eq!(outcome.dropped, 0);
        assert_eq!(outcome.removed, 0);

        for rx in &mut receivers {
            let Some(frame) = rx.recv().await else {
                panic!("every connection must receive the frame");
            };
            assert_eq!(&*frame, "[1,2,3]");
        }
    }

    #[tokio::test]
    async fn closed_connection_does_not_block_others() {
        let registry = ConnectionRegistry::new();

        let (tx_dead, rx_dead) = mpsc::channel(4);
        registry.add(tx_dead).await;
        drop(rx_dead);

        let (tx_live, mut rx_live) = mpsc::channel(4);
        registry.add(tx_live).await;
        let _ = rx_live.recv().await; // ack

        let outcome = registry.broadcast(Frame::from("payload")).await;
        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.removed, 1);
        assert_eq!(registry.len().await, 1);

        let Some(frame) = rx_live.recv().await else {
            panic!("live connection must still receive the frame");
        };
        assert_eq!(&*frame, "payload");
    }

    #[tokio::test]
    async fn full_queue_drops_frame_without_removal() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(1); // ack fills the only slot
        registry.add(tx).await;

        let outcome = registry.broadcast(Frame::from("payload")).await;
        assert_eq!(outcome.delivered, 0);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.removed, 0);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(4);
        let id = registry.add(tx).await;

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn broadcast_with_no_connections_is_a_noop() {
        let registry = ConnectionRegistry::new();
        let outcome = registry.broadcast(Frame::from("x")).await;
        assert_eq!(outcome, BroadcastOutcome::default());
    }
}
