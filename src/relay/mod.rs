//! Relay core: wires the worker adapter to the connection registry.
//!
//! Client → worker: [`Relay::forward`] hands a decoded [`Command`] to the
//! adapter verbatim — no schema validation, no rate limiting. Semantic
//! correctness is the worker's responsibility.
//!
//! Worker → clients: the snapshot pump subscribes to the adapter's bus,
//! serializes each snapshot once, and broadcasts the identical payload to
//! every registered connection.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::domain::{Command, ConnectionRegistry, Frame};
use crate::worker::WorkerAdapter;

/// Stateless coordinator owning the worker adapter and the registry.
#[derive(Debug, Clone)]
pub struct Relay {
    worker: WorkerAdapter,
    registry: Arc<ConnectionRegistry>,
}

impl Relay {
    /// Creates a new `Relay`.
    #[must_use]
    pub fn new(worker: WorkerAdapter, registry: Arc<ConnectionRegistry>) -> Self {
        Self { worker, registry }
    }

    /// Returns the connection registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Returns the worker adapter.
    #[must_use]
    pub fn worker(&self) -> &WorkerAdapter {
        &self.worker
    }

    /// Forwards one decoded client command to the worker, verbatim.
    pub fn forward(&self, command: Command) {
        self.worker.send(command);
    }

    /// Spawns the snapshot pump task.
    ///
    /// The pump runs until the worker adapter's bus closes (worker gone and
    /// adapter dropped). A lagged receiver only means intermediate snapshots
    /// were superseded — each broadcast still carries one whole snapshot, so
    /// clients observe latest state, never a mix.
    pub fn spawn_snapshot_pump(&self) -> JoinHandle<()> {
        let mut rx = self.worker.subscribe();
        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(snapshot) => {
                        let frame = match snapshot.to_frame() {
                            Ok(text) => Frame::from(text.as_str()),
                            Err(e) => {
                                tracing::warn!(error = %e, "snapshot serialization failed");
                                continue;
                            }
                        };
                        let outcome = registry.broadcast(frame).await;
                        tracing::debug!(
                            delivered = outcome.delivered,
                            dropped = outcome.dropped,
                            removed = outcome.removed,
                            "snapshot broadcast"
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "snapshot pump lagged, older snapshots skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("snapshot stream ended");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use std::net::IpAddr;
    use std::path::PathBuf;
    use tokio::sync::mpsc;

    fn test_config(worker_command: &[&str]) -> GatewayConfig {
        GatewayConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            worker_command: worker_command.iter().map(ToString::to_string).collect(),
            static_dir: PathBuf::from("public"),
            throttle_interval_ms: 100,
            default_scale: 0.3,
            snapshot_bus_capacity: 16,
            command_buffer: 16,
            client_send_buffer: 8,
        }
    }

    #[tokio::test]
    async fn pump_broadcasts_identical_frames_to_all_connections() {
        let config = test_config(&[
            "sh",
            "-c",
            r#"echo '[{"pin":1,"x":0,"y":0,"actuation":0.5}]'; sleep 5"#,
        ]);
        let Ok(worker) = WorkerAdapter::spawn(&config) else {
            panic!("stub worker must spawn");
        };
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = Relay::new(worker, Arc::clone(&registry));
        let _pump = relay.spawn_snapshot_pump();

        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        registry.add(tx1).await;
        registry.add(tx2).await;
        let _ = rx1.recv().await; // ack
        let _ = rx2.recv().await; // ack

        let timeout = std::time::Duration::from_secs(5);
        let Ok(Some(f1)) = tokio::time::timeout(timeout, rx1.recv()).await else {
            panic!("client 1 must receive the snapshot");
        };
        let Ok(Some(f2)) = tokio::time::timeout(timeout, rx2.recv()).await else {
            panic!("client 2 must receive the snapshot");
        };
        assert_eq!(f1, f2);
        assert!(f1.contains("\"actuation\""));
        relay.worker().shutdown();
    }
}
