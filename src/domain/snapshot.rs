//! Worker state snapshots and actuator records.
//!
//! The worker periodically emits one complete [`Snapshot`]: an ordered array
//! of [`Actuator`] readings that fully replaces any prior state on receipt.
//! Snapshots are never deltas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// Identifier of one addressable output unit.
///
/// The stock worker reports numeric pin indices, but string identifiers are
/// accepted so alternative engines can name their outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PinId {
    /// Numeric pin index (e.g. an Arduino pin number).
    Number(i64),
    /// Symbolic output name.
    Name(String),
}

/// One actuator reading within a snapshot.
///
/// `actuation` is the worker's commanded output level in `[0, 1]`; `x`/`y`
/// locate the actuator in the worker's normalized coordinate space. Any
/// extra per-actuator fields the worker emits (the stock engine adds
/// `pressure`) are captured in `extra` and re-serialized unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actuator {
    /// Output unit identifier.
    pub pin: PinId,
    /// Horizontal position in normalized units.
    pub x: f64,
    /// Vertical position in normalized units.
    pub y: f64,
    /// Output level in `[0, 1]`.
    pub actuation: f64,
    /// Worker-specific extra fields, passed through opaquely.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One complete worker state report: an ordered sequence of actuator records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<Actuator>);

impl Snapshot {
    /// Parses one framed worker output line as a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedSnapshot`] if the line is not a JSON
    /// array of actuator records.
    pub fn parse(line: &str) -> Result<Self, GatewayError> {
        serde_json::from_str(line).map_err(|e| GatewayError::MalformedSnapshot(e.to_string()))
    }

    /// Serializes the snapshot to the broadcast wire form.
    ///
    /// Called once per snapshot; every client receives the identical text.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedSnapshot`] if serialization fails
    /// (kept explicit rather than panicking).
    pub fn to_frame(&self) -> Result<String, GatewayError> {
        serde_json::to_string(self).map_err(|e| GatewayError::MalformedSnapshot(e.to_string()))
    }

    /// Returns the actuator records in report order.
    #[must_use]
    pub fn actuators(&self) -> &[Actuator] {
        &self.0
    }

    /// Returns the number of actuator records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the snapshot reports no actuators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Actuator>> for Snapshot {
    fn from(actuators: Vec<Actuator>) -> Self {
        Self(actuators)
    }
}
