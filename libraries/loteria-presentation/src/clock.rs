//! Time sources for the presentation timer
//!
//! Timestamps are offsets from the clock's own origin, so they never go
//! backwards and are unaffected by wall-clock adjustments.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// The instant corresponding to timestamp zero
    ///
    /// Drivers use this to turn session deadlines into sleep targets.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Convert a session timestamp into an [`Instant`]
    pub fn instant_at(&self, timestamp: Duration) -> Instant {
        self.origin + timestamp
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock
///
/// Clones share the same time, so a test can keep one handle while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Move time forward by whole milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Jump to an absolute timestamp (never backwards)
    pub fn set(&self, to: Duration) {
        self.nanos
            .fetch_max(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_shares_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        assert_eq!(clock.now(), Duration::ZERO);

        handle.advance_ms(3000);
        assert_eq!(clock.now(), Duration::from_millis(3000));

        handle.set(Duration::from_millis(1000));
        assert_eq!(clock.now(), Duration::from_millis(3000)); // never backwards

        handle.set(Duration::from_millis(5000));
        assert_eq!(clock.now(), Duration::from_millis(5000));
    }

    #[test]
    fn monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert_eq!(clock.instant_at(Duration::ZERO), clock.origin());
    }
}
