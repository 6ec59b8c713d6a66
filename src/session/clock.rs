//! Time sources for the session engine.
//!
//! The engine never calls `SystemTime::now()` directly. Production code uses
//! [`SystemClock`]; tests drive a [`ManualClock`] forward explicitly.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Supplies the current wall-clock time.
///
/// Wall-clock time (not a monotonic instant) is used on purpose: it keeps
/// advancing while the machine sleeps, which is what wake detection relies on.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same underlying time, so a test can keep one handle while
/// the engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Creates a clock frozen at the Unix epoch.
    pub fn at_epoch() -> Self {
        Self::new(SystemTime::UNIX_EPOCH)
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// Moves the clock backwards by `by` (simulates a wall-clock correction).
    pub fn rewind(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.checked_sub(by).unwrap_or(SystemTime::UNIX_EPOCH);
    }

    /// Sets the clock to an absolute time.
    pub fn set(&self, to: SystemTime) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at_epoch()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Elapsed time from `earlier` to `later`, clamped to zero.
pub fn elapsed_between(earlier: SystemTime, later: SystemTime) -> Duration {
    later.duration_since(earlier).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_at_given_time() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::at_epoch();
        clock.advance(Duration::from_secs(60));
        assert_eq!(clock.now(), SystemTime::UNIX_EPOCH + Duration::from_secs(60));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::at_epoch();
        let handle = clock.clone();

        handle.advance(Duration::from_secs(5));

        assert_eq!(clock.now(), handle.now());
    }

    #[test]
    fn test_manual_clock_rewind_saturates_at_epoch() {
        let clock = ManualClock::at_epoch();
        clock.advance(Duration::from_secs(10));
        clock.rewind(Duration::from_secs(60));
        assert_eq!(clock.now(), SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.now() > SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn test_elapsed_between_never_negative() {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(40);

        assert_eq!(elapsed_between(t1, t0), Duration::from_secs(60));
        assert_eq!(elapsed_between(t0, t1), Duration::ZERO);
    }
}
