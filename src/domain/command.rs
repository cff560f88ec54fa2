//! Client commands forwarded to the worker process.
//!
//! A [`Command`] is one client-originated JSON object. The gateway's contract
//! is purely structural: the frame must parse as a JSON object. Semantic
//! validation (recognized keys, value ranges) is the worker's job, so
//! unrecognized keys pass through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// One client-originated instruction, forwarded verbatim to the worker.
///
/// Known keys the stock worker reacts to: `mode`, `speed`, `strength`,
/// `size`, `hold`, `release`, `max_speed`, and a cursor position `x`/`y` in
/// normalized units. None of these are enforced here; any JSON object is a
/// valid command and reaches the worker unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(Map<String, Value>);

impl Command {
    /// Parses one inbound text frame as a command.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedCommand`] if the frame is not valid
    /// JSON or its top-level value is not an object.
    pub fn parse(frame: &str) -> Result<Self, GatewayError> {
        let value: Value =
            serde_json::from_str(frame).map_err(|e| GatewayError::MalformedCommand(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(GatewayError::MalformedCommand(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Serializes the command as one newline-terminated wire line for the
    /// worker's stdin.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedCommand`] if serialization fails
    /// (cannot happen for a plain JSON map, but the error path is kept
    /// explicit rather than panicking).
    pub fn to_line(&self) -> Result<String, GatewayError> {
        let mut line = serde_json::to_string(&self.0)
            .map_err(|e| GatewayError::MalformedCommand(e.to_string()))?;
        line.push('\n');
        Ok(line)
    }

    /// Returns the value for a top-level key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the command carries no keys (`{}` is still valid).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Command {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
