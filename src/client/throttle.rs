//! Pointer-event throttle for UI clients.
//!
//! A pointer device emits far more move events than the worker needs.
//! [`InputThrottle`] enforces the client-side contract: at most one send in
//! flight at a time, and at least a fixed minimum interval between accepted
//! events.

use std::time::{Duration, Instant};

/// Rate limiter with an in-flight guard.
///
/// The caller passes the current instant explicitly, which keeps the type
/// deterministic under test and free of any clock dependency.
#[derive(Debug)]
pub struct InputThrottle {
    min_interval: Duration,
    last_accepted: Option<Instant>,
    in_flight: bool,
}

impl InputThrottle {
    /// Creates a throttle with the given minimum interval between accepted
    /// events (the `throttle_interval_ms` configuration value).
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
            in_flight: false,
        }
    }

    /// Attempts to accept an event at `now`.
    ///
    /// Returns `true` and marks a send in flight iff no send is currently in
    /// flight and at least the minimum interval has elapsed since the last
    /// accepted event. The first event is always accepted.
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.in_flight {
            return false;
        }
        if let Some(last) = self.last_accepted
            && now.duration_since(last) < self.min_interval
        {
            return false;
        }
        self.last_accepted = Some(now);
        self.in_flight = true;
        true
    }

    /// Marks the in-flight send complete (or abandoned).
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Returns `true` while a send is in flight.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
