//! Minimum-interval gate for emitted results

use crate::types::Timestamp;

/// Default minimum interval between emitted results, in milliseconds
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 500;

/// Update throttle
///
/// Like [`LowPassFilter`](crate::LowPassFilter) this is stateless: each
/// stream keeps its own next-allowed timestamp and the throttle only
/// answers whether a sample may emit and when the next one may.
///
/// # Example
/// ```
/// use orientation_engine::UpdateThrottle;
///
/// let throttle = UpdateThrottle::default();
/// let next_allowed = 0;
///
/// assert!(throttle.should_emit(0, next_allowed));
/// let next_allowed = throttle.advance(0);
/// assert!(!throttle.should_emit(0, next_allowed));
/// assert!(throttle.should_emit(500, next_allowed));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateThrottle {
    interval_ms: u64,
}

impl UpdateThrottle {
    /// Creates a throttle with the given interval in milliseconds
    pub const fn new(interval_ms: u64) -> Self {
        Self { interval_ms }
    }

    /// True when a sample arriving at `now` may produce output.
    pub const fn should_emit(&self, now: Timestamp, next_allowed: Timestamp) -> bool {
        now >= next_allowed
    }

    /// Next allowed timestamp after emitting at `now`.
    pub const fn advance(&self, now: Timestamp) -> Timestamp {
        now.saturating_add(self.interval_ms)
    }

    /// Get the interval in milliseconds
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

impl Default for UpdateThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL_MS)
    }
}
