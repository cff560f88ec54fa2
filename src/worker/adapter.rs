//! Worker process adapter: command writing, snapshot framing, diagnostics.
//!
//! [`WorkerAdapter`] wraps one [`WorkerProcess`] with four tasks:
//!
//! - a **writer** task, the only writer of the worker's stdin — commands
//!   arrive through a bounded channel and leave as whole newline-terminated
//!   lines, so concurrent senders can never interleave bytes;
//! - a **reader** task feeding stdout bytes through a [`LineFramer`] and
//!   publishing every successfully parsed [`Snapshot`] to the bus;
//! - a **stderr** task logging diagnostics line-by-line;
//! - a **waiter** task owning the process handle, logging its exit and
//!   killing it on shutdown.
//!
//! The adapter never restarts the worker. When the worker dies, the snapshot
//! stream simply ends; client connections stay open.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStderr, ChildStdin, ChildStdout};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Notify, broadcast, mpsc};

use super::framing::LineFramer;
use super::process::WorkerProcess;
use crate::config::GatewayConfig;
use crate::domain::{Command, Snapshot, SnapshotBus};
use crate::error::GatewayError;

/// Exclusive owner of the single worker process.
#[derive(Debug, Clone)]
pub struct WorkerAdapter {
    command_tx: mpsc::Sender<Command>,
    snapshots: SnapshotBus,
    shutdown: Arc<Notify>,
}

impl WorkerAdapter {
    /// Spawns the configured worker and wires up its I/O tasks.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::WorkerSpawn`] or
    /// [`GatewayError::WorkerCommandEmpty`] if the process cannot be
    /// launched. Spawn failure is fatal: the server does not come up.
    pub fn spawn(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut process = WorkerProcess::spawn(&config.worker_command)?;

        let stdin = process.stdin.take();
        let stdout = process.stdout.take();
        let stderr = process.stderr.take();

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
        let snapshots = SnapshotBus::new(config.snapshot_bus_capacity);
        let shutdown = Arc::new(Notify::new());

        if let Some(stdin) = stdin {
            tokio::spawn(writer_loop(stdin, command_rx));
        }
        if let Some(stdout) = stdout {
            tokio::spawn(reader_loop(stdout, snapshots.clone()));
        }
        if let Some(stderr) = stderr {
            tokio::spawn(stderr_loop(stderr));
        }
        tokio::spawn(waiter_loop(process, Arc::clone(&shutdown)));

        Ok(Self {
            command_tx,
            snapshots,
            shutdown,
        })
    }

    /// Hands a command to the writer task without blocking.
    ///
    /// If the command queue is full or the worker is gone, the command is
    /// dropped and logged. Commands are never queued beyond the bounded
    /// channel and never retried.
    pub fn send(&self, command: Command) {
        match self.command_tx.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("command queue full, command dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("worker stdin writer gone, command dropped");
            }
        }
    }

    /// Creates a receiver of all future parsed snapshots.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Returns the underlying snapshot bus.
    #[must_use]
    pub fn snapshots(&self) -> &SnapshotBus {
        &self.snapshots
    }

    /// Signals the waiter task to terminate the worker process.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Single writer of the worker's stdin.
///
/// One received command becomes exactly one complete line. A write failure
/// drops that command and is logged; the loop keeps draining so later
/// commands still get their chance (the waiter reports the actual exit).
async fn writer_loop(mut stdin: ChildStdin, mut command_rx: mpsc::Receiver<Command>) {
    while let Some(command) = command_rx.recv().await {
        let line = match command.to_line() {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "unserializable command dropped");
                continue;
            }
        };
        if let Err(e) = stdin.write_all(line.as_bytes()).await {
            tracing::warn!(error = %e, "worker stdin not writable, command dropped");
            continue;
        }
        if let Err(e) = stdin.flush().await {
            tracing::warn!(error = %e, "worker stdin flush failed");
        }
    }
    tracing::debug!("command writer stopped");
}

/// Single reader of the worker's stdout.
///
/// Frames the byte stream into newline-delimited messages and publishes
/// every parse success. A parse failure discards only that message, logged
/// with the raw content for diagnosis.
async fn reader_loop(mut stdout: ChildStdout, bus: SnapshotBus) {
    let mut framer = LineFramer::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stdout.read(&mut chunk).await {
            Ok(0) => {
                tracing::info!("worker stdout closed");
                break;
            }
            Ok(n) => {
                let Some(bytes) = chunk.get(..n) else {
                    continue;
                };
                if framer.push(bytes) {
                    tracing::warn!("worker output exceeded frame buffer, fragment discarded");
                }
                while let Some(line) = framer.next_message() {
                    match Snapshot::parse(&line) {
                        Ok(snapshot) => {
                            bus.publish(snapshot);
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, raw = %line, "unparseable worker output dropped");
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "worker stdout read failed");
                break;
            }
        }
    }
}

/// Logs the worker's stderr line-by-line. Diagnostic only, never forwarded.
async fn stderr_loop(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::warn!(line = %line, "worker stderr");
    }
}

/// Owns the process handle: reports exit, kills on shutdown.
async fn waiter_loop(mut process: WorkerProcess, shutdown: Arc<Notify>) {
    tokio::select! {
        status = process.wait() => match status {
            Ok(status) => {
                tracing::error!(%status, "worker process exited, snapshot stream ended");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed waiting on worker process");
            }
        },
        () = shutdown.notified() => {
            process.kill().await;
            tracing::info!("worker terminated on shutdown");
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use std::path::PathBuf;

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
    async fn snapshot_from_echoing_worker_is_published() {
        let config = test_config(&[
            "sh",
            "-c",
            r#"echo '[{"pin":1,"x":0,"y":0,"actuation":0.5}]'; sleep 5"#,
        ]);
        let Ok(adapter) = WorkerAdapter::spawn(&config) else {
            panic!("stub worker must spawn");
        };
        let mut rx = adapter.subscribe();

        let received = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv()).await;
        let Ok(Ok(snapshot)) = received else {
            panic!("expected one snapshot from stub worker");
        };
        assert_eq!(snapshot.len(), 1);
        adapter.shutdown();
    }

    #[tokio::test]
    async fn garbage_output_is_dropped_and_stream_continues() {
        let config = test_config(&[
            "sh",
            "-c",
            r#"echo 'not json'; echo '[{"pin":2,"x":1,"y":1,"actuation":1}]'; sleep 5"#,
        ]);
        let Ok(adapter) = WorkerAdapter::spawn(&config) else {
            panic!("stub worker must spawn");
        };
        let mut rx = adapter.subscribe();

        let received = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv()).await;
        let Ok(Ok(snapshot)) = received else {
            panic!("expected the valid snapshot after the garbage line");
        };
        let Some(actuator) = snapshot.actuators().first() else {
            panic!("expected one actuator");
        };
        assert_eq!(actuator.pin, crate::domain::PinId::Number(2));
        adapter.shutdown();
    }

    #[tokio::test]
    async fn commands_reach_worker_stdin_as_whole_lines() {
        let Ok(capture) = tempfile::NamedTempFile::new() else {
            panic!("tempfile must be creatable");
        };
        let path = capture.path().to_string_lossy().into_owned();
        let config = test_config(&["sh", "-c", &format!("cat > {path}")]);
        let Ok(adapter) = WorkerAdapter::spawn(&config) else {
            panic!("stub worker must spawn");
        };

        for i in 0..10 {
            let Ok(cmd) = Command::parse(&format!(r#"{{"speed":{i}}}"#)) else {
                panic!("test command must parse");
            };
            adapter.send(cmd);
        }

        // Give the writer task time to drain, then stop the worker so the
        // capture file is flushed.
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        adapter.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let Ok(contents) = std::fs::read_to_string(capture.path()) else {
            panic!("capture file must be readable");
        };
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 10);
        for line in lines {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
        }
    }

    #[tokio::test]
    async fn worker_exit_does_not_panic_adapter() {
        let config = test_config(&["sh", "-c", "exit 3"]);
        let Ok(adapter) = WorkerAdapter::spawn(&config) else {
            panic!("stub worker must spawn");
        };
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        // Sending after exit is a logged drop, not an error.
        let Ok(cmd) = Command::parse(r#"{"mode":"A"}"#) else {
            panic!("test command must parse");
        };
        adapter.send(cmd);
    }
}
