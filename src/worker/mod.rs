//! Worker process layer: subprocess lifecycle, output framing, and the
//! adapter that turns the raw process into command/snapshot streams.

pub mod adapter;
pub mod framing;
pub mod process;

pub use adapter::WorkerAdapter;
pub use framing::LineFramer;
pub use process::WorkerProcess;
