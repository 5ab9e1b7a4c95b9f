//! Host time adapter.
//!
//! Provides the monotonic [`Clock`] for host-side runs and simulation,
//! backed by `std::time::Instant`.  Firmware targets supply their own
//! clock wrapping the platform's high-resolution timer.

use crate::app::ports::Clock;

/// Monotonic clock counting from construction.
pub struct HostClock {
    start: std::time::Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for HostClock {
    /// Microseconds since construction (monotonic, wraps at `u64::MAX`).
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}
