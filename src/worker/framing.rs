//! Incremental newline-delimited framing for worker output.
//!
//! The worker writes one JSON document per line, but a single read from its
//! stdout pipe may carry a fragment of a line, one line, or several lines.
//! [`LineFramer`] accumulates bytes across reads and yields zero or more
//! complete messages per read, so fragmented and batched output are both
//! handled correctly.

/// Upper bound on accumulated bytes awaiting a delimiter.
///
/// A worker that streams data without ever emitting a newline must not grow
/// the buffer without bound; past this limit the pending fragment is
/// discarded.
const MAX_PENDING_BYTES: usize = 1024 * 1024;

/// Accumulates raw bytes and splits them into newline-terminated messages.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
}

impl LineFramer {
    /// Creates an empty framer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one read's worth of bytes.
    ///
    /// Returns `true` if the pending fragment exceeded
    /// [`MAX_PENDING_BYTES`] and was discarded; the caller should log this.
    pub fn push(&mut self, bytes: &[u8]) -> bool {
        self.buf.extend_from_slice(bytes);
        if self.buf.len() > MAX_PENDING_BYTES {
            self.buf.clear();
            return true;
        }
        false
    }

    /// Removes and returns the next complete message, without its trailing
    /// newline. Returns `None` once only an incomplete fragment remains.
    ///
    /// Empty lines are skipped. Bytes are decoded lossily; the worker
    /// contract is UTF-8 JSON, so replacement characters simply surface as
    /// a parse failure downstream.
    pub fn next_message(&mut self) -> Option<String> {
        loop {
            let newline = self.buf.iter().position(|&b| b == b'\n')?;
            let mut line: Vec<u8> = self.buf.drain(..=newline).collect();
            line.pop(); // trailing '\n'
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }
            return Some(String::from_utf8_lossy(&line).into_owned());
        }
    }

    /// Returns the number of buffered bytes not yet forming a complete
    /// message.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }
}
