//! Viewport-to-command coordinate mapping for UI clients.
//!
//! Pointer coordinates arrive in viewport pixel space. The worker expects a
//! cursor position in its normalized coordinate space: the viewport rect is
//! mapped onto the symmetric unit square `[-1, 1]²` about its center, and
//! the result is divided by a user-adjustable `scale` so a smaller scale
//! reaches further into the worker's space.

use serde_json::{Map, Value};

use crate::domain::Command;

/// The measured rectangle of the client's rendering surface, in pixels.
///
/// Callers should measure this at the rendering tick that processes the
/// event, so it reflects current layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// A cursor position in the worker's normalized coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPosition {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl From<CursorPosition> for Command {
    fn from(pos: CursorPosition) -> Self {
        let mut map = Map::new();
        map.insert("x".to_string(), Value::from(pos.x));
        map.insert("y".to_string(), Value::from(pos.y));
        Self::from(map)
    }
}

/// Converts viewport pixel coordinates into worker cursor commands.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    scale: f64,
}

impl CoordinateMapper {
    /// Creates a mapper with the given scale factor (the `default_scale`
    /// configuration value, adjustable at runtime).
    #[must_use]
    pub const fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Updates the scale factor.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Returns the current scale factor.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps a pointer position to a normalized cursor position.
    ///
    /// The point is first mapped to the unit square about the viewport
    /// center. Points outside the open square are discarded — the check
    /// happens before the scale division, so the discard boundary is the
    /// viewport edge regardless of scale. Inside points are divided by the
    /// scale factor and may therefore exceed `[-1, 1]`.
    #[must_use]
    pub fn map(&self, px: f64, py: f64, viewport: Viewport) -> Option<CursorPosition> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }
        let relative_x = (px - viewport.left) / viewport.width;
        let relative_y = (py - viewport.top) / viewport.height;
        let x = relative_x * 2.0 - 1.0;
        let y = relative_y * 2.0 - 1.0;
        if x.abs() < 1.0 && y.abs() < 1.0 {
            Some(CursorPosition {
                x: x / self.scale,
                y: y / self.scale,
            })
        } else {
            None
        }
    }
}
