//! Gateway error types.
//!
//! [`GatewayError`] is the central error type. The containment policy is
//! strict: per-message and per-connection failures are logged and dropped at
//! the point of origin, so most variants never cross a task boundary. Only
//! startup failures (bad configuration, worker spawn) propagate out of
//! `main` and abort the server.

/// Server-side error enum.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The configured worker command is empty.
    #[error("worker command is empty; set WORKER_COMMAND")]
    WorkerCommandEmpty,

    /// The worker executable could not be launched. Fatal at startup.
    #[error("failed to spawn worker `{command}`: {source}")]
    WorkerSpawn {
        /// The command that failed to launch.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The configured listen host could not be parsed as an IP address.
    #[error("invalid listen host `{0}`")]
    InvalidListenHost(String),

    /// An inbound client frame was not a valid JSON object.
    #[error("malformed command: {0}")]
    MalformedCommand(String),

    /// A framed worker output line was not a valid snapshot document.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// I/O failure on the worker's stdio or the listen socket.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn spawn_error_names_the_command() {
        let err = GatewayError::WorkerSpawn {
            command: "python3 process.py".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("python3 process.py"));
    }

    #[test]
    fn malformed_command_is_descriptive() {
        let err = GatewayError::MalformedCommand("expected a JSON object".to_string());
        assert!(err.to_string().contains("malformed command"));
    }
}
