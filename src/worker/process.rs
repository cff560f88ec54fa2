//! Worker subprocess lifecycle.
//!
//! Spawns the external control engine with piped stdio and owns its OS-level
//! handle. Exactly one [`WorkerProcess`] exists for the lifetime of the
//! server; the adapter holds it exclusively.

use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout};

use crate::error::GatewayError;

/// A running worker subprocess with piped I/O handles.
///
/// The stdio handles are `take()`n once by the adapter's I/O tasks; the
/// process handle itself stays here for exit monitoring and termination.
#[derive(Debug)]
pub struct WorkerProcess {
    child: Child,
    /// Piped stdin — drained by the single command writer task.
    pub stdin: Option<ChildStdin>,
    /// Piped stdout — consumed by the single snapshot reader task.
    pub stdout: Option<ChildStdout>,
    /// Piped stderr — logged line-by-line, never parsed.
    pub stderr: Option<ChildStderr>,
}

impl WorkerProcess {
    /// Spawns the worker from the given command line (executable first,
    /// arguments after) with all three stdio streams piped.
    ///
    /// `kill_on_drop` is set as a backstop so an aborted server cannot leak
    /// the child.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::WorkerCommandEmpty`] for an empty command
    /// line, or [`GatewayError::WorkerSpawn`] if the executable cannot be
    /// launched. Both are fatal at startup.
    pub fn spawn(command: &[String]) -> Result<Self, GatewayError> {
        let (program, args) = command
            .split_first()
            .ok_or(GatewayError::WorkerCommandEmpty)?;

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GatewayError::WorkerSpawn {
                command: command.join(" "),
                source,
            })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        tracing::info!(command = %command.join(" "), pid = ?child.id(), "worker spawned");

        Ok(Self {
            child,
            stdin,
            stdout,
            stderr,
        })
    }

    /// Waits for the worker to exit.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if waiting on the child fails.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Terminates the worker immediately. No drain or flush grace period is
    /// given; the control engine is stateless between runs.
    pub async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::warn!(error = %e, "failed to kill worker process");
        }
    }
}
