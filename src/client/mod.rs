//! Reference client-side input pipeline.
//!
//! The shipped browser client implements this pipeline in JavaScript; these
//! types are the same contract for native Rust clients: throttle pointer
//! events, map viewport coordinates into the worker's space, render
//! snapshots. Nothing here touches the relay's state.

pub mod mapper;
pub mod renderer;
pub mod throttle;

pub use mapper::{CoordinateMapper, CursorPosition, Viewport};
pub use renderer::Renderer;
pub use throttle::InputThrottle;
