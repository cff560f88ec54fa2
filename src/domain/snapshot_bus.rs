//! Broadcast channel for parsed worker snapshots.
//!
//! [`SnapshotBus`] wraps a [`tokio::sync::broadcast`] channel. The worker
//! adapter publishes every successfully parsed [`Snapshot`] through the bus;
//! the relay's snapshot pump subscribes to fan them out to clients.

use tokio::sync::broadcast;

use super::Snapshot;

/// Broadcast bus for [`Snapshot`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest snapshots are dropped for
/// lagging receivers — freshness over completeness.
#[derive(Debug, Clone)]
pub struct SnapshotBus {
    sender: broadcast::Sender<Snapshot>,
}

impl SnapshotBus {
    /// Creates a new `SnapshotBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a snapshot to all subscribers.
    ///
    /// Returns the number of receivers that received it. With no active
    /// receivers the snapshot is silently dropped.
    pub fn publish(&self, snapshot: Snapshot) -> usize {
        self.sender.send(snapshot).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future snapshots.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_snapshot(actuation: f64) -> Snapshot {
        let line = format!(r#"[{{"pin":1,"x":0.0,"y":0.0,"actuation":{actuation}}}]"#);
        let Ok(snap) = Snapshot::parse(&line) else {
            panic!("test snapshot must parse");
        };
        snap
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = SnapshotBus::new(8);
        assert_eq!(bus.publish(make_snapshot(0.5)), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_snapshot() {
        let bus = SnapshotBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(make_snapshot(0.5));

        let Ok(snap) = rx.recv().await else {
            panic!("expected to receive snapshot");
        };
        assert_eq!(snap.len(), 1);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_snapshot() {
        let bus = SnapshotBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let count = bus.publish(make_snapshot(0.25));
        assert_eq!(count, 2);

        let Ok(s1) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(s2) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(s1, s2);
    }

    #[tokio::test]
    async fn lagging_receiver_observes_latest_whole_snapshot() {
        let bus = SnapshotBus::new(1);
        let mut rx = bus.subscribe();

        bus.publish(make_snapshot(0.1));
        bus.publish(make_snapshot(0.9));

        // Capacity 1: the older snapshot was evicted, so the receiver lags
        // once and then sees only the later snapshot, never a mix.
        let lagged = rx.recv().await;
        assert!(matches!(
            lagged,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        let Ok(snap) = rx.recv().await else {
            panic!("expected latest snapshot after lag");
        };
        let Some(actuator) = snap.actuators().first() else {
            panic!("expected one actuator");
        };
        assert!((actuator.actuation - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = SnapshotBus::new(8);
        assert_eq!(bus.receiver_count(), 0);
        let rx1 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);
        let rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);
        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
        drop(rx2);
    }
}
