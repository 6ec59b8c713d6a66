//! User activity probing.
//!
//! The session engine only needs two answers from the OS: how long ago the
//! last input event happened, and whether the display is asleep. This module
//! defines that seam:
//!
//! - [`ActivityProbe`]: the trait the engine consumes
//! - `CoreGraphicsProbe`: macOS implementation (window server event source)
//! - [`UnsupportedProbe`]: fallback that always reports [`ProbeError::Unsupported`]
//! - [`MockActivityProbe`]: scripted readings for tests

pub mod error;
#[cfg(target_os = "macos")]
mod macos;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use self::error::ProbeError;
#[cfg(target_os = "macos")]
pub use self::macos::CoreGraphicsProbe;

use crate::types::ActivityReading;

// ============================================================================
// ActivityProbe
// ============================================================================

/// Source of user activity samples.
pub trait ActivityProbe {
    /// Time since the most recent input event (pointer buttons, pointer
    /// movement, key down, scroll).
    fn since_last_input(&self) -> Result<Duration, ProbeError>;

    /// Whether the main display is asleep.
    fn is_display_asleep(&self) -> Result<bool, ProbeError>;

    /// Short identifier for logging.
    fn name(&self) -> &'static str;

    /// Takes one complete reading.
    fn read(&self) -> Result<ActivityReading, ProbeError> {
        Ok(ActivityReading::new(
            self.since_last_input()?,
            self.is_display_asleep()?,
        ))
    }
}

impl<P: ActivityProbe + ?Sized> ActivityProbe for Box<P> {
    fn since_last_input(&self) -> Result<Duration, ProbeError> {
        (**self).since_last_input()
    }

    fn is_display_asleep(&self) -> Result<bool, ProbeError> {
        (**self).is_display_asleep()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<P: ActivityProbe + ?Sized> ActivityProbe for Arc<P> {
    fn since_last_input(&self) -> Result<Duration, ProbeError> {
        (**self).since_last_input()
    }

    fn is_display_asleep(&self) -> Result<bool, ProbeError> {
        (**self).is_display_asleep()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Converts an OS idle time in seconds into a duration.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn idle_seconds_to_duration(seconds: f64) -> Result<Duration, ProbeError> {
    if seconds < 0.0 {
        return Err(ProbeError::InvalidIdleTime(seconds));
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| ProbeError::InvalidIdleTime(seconds))
}

/// Returns the best probe available on this platform.
pub fn platform_probe() -> Box<dyn ActivityProbe + Send> {
    #[cfg(target_os = "macos")]
    {
        Box::new(CoreGraphicsProbe::new())
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(UnsupportedProbe)
    }
}

// ============================================================================
// UnsupportedProbe
// ============================================================================

/// Probe for platforms without an activity source.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedProbe;

impl ActivityProbe for UnsupportedProbe {
    fn since_last_input(&self) -> Result<Duration, ProbeError> {
        Err(ProbeError::Unsupported)
    }

    fn is_display_asleep(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Unsupported)
    }

    fn name(&self) -> &'static str {
        "unsupported"
    }
}

// ============================================================================
// MockActivityProbe
// ============================================================================

/// Probe returning whatever reading the test last set.
#[derive(Debug)]
pub struct MockActivityProbe {
    reading: Mutex<ActivityReading>,
    should_fail: AtomicBool,
}

impl MockActivityProbe {
    /// Creates a probe that reports continuous activity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reading: Mutex::new(ActivityReading::active()),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Sets the reading returned by subsequent calls.
    pub fn set_reading(&self, reading: ActivityReading) {
        *self.reading.lock().unwrap_or_else(|e| e.into_inner()) = reading;
    }

    /// Reports input `secs` seconds ago with the display awake.
    pub fn set_input_secs_ago(&self, secs: u64) {
        self.set_reading(ActivityReading::input_secs_ago(secs));
    }

    /// Sets only the display sleep flag.
    pub fn set_display_asleep(&self, asleep: bool) {
        self.reading.lock().unwrap_or_else(|e| e.into_inner()).display_asleep = asleep;
    }

    /// Makes every query fail with [`ProbeError::QueryFailed`].
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), ProbeError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(ProbeError::QueryFailed("Mock failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MockActivityProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityProbe for MockActivityProbe {
    fn since_last_input(&self) -> Result<Duration, ProbeError> {
        self.check_failure()?;
        Ok(self.reading.lock().unwrap_or_else(|e| e.into_inner()).since_last_input)
    }

    fn is_display_asleep(&self) -> Result<bool, ProbeError> {
        self.check_failure()?;
        Ok(self.reading.lock().unwrap_or_else(|e| e.into_inner()).display_asleep)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_valid_seconds() {
            assert_eq!(
                idle_seconds_to_duration(1.5).unwrap(),
                Duration::from_millis(1_500)
            );
            assert_eq!(idle_seconds_to_duration(0.0).unwrap(), Duration::ZERO);
        }

        #[test]
        fn test_negative_rejected() {
            assert!(matches!(
                idle_seconds_to_duration(-3.0),
                Err(ProbeError::InvalidIdleTime(_))
            ));
        }

        #[test]
        fn test_non_finite_rejected() {
            assert!(idle_seconds_to_duration(f64::NAN).is_err());
            assert!(idle_seconds_to_duration(f64::INFINITY).is_err());
        }
    }

    mod mock_tests {
        use super::*;

        #[test]
        fn test_defaults_to_active() {
            let probe = MockActivityProbe::new();
            assert_eq!(probe.read().unwrap(), ActivityReading::active());
        }

        #[test]
        fn test_set_reading() {
            let probe = MockActivityProbe::new();
            probe.set_input_secs_ago(300);
            probe.set_display_asleep(true);

            let reading = probe.read().unwrap();
            assert_eq!(reading.since_last_input, Duration::from_secs(300));
            assert!(reading.display_asleep);
        }

        #[test]
        fn test_failure() {
            let probe = MockActivityProbe::new();
            probe.set_should_fail(true);

            assert!(matches!(probe.read(), Err(ProbeError::QueryFailed(_))));

            probe.set_should_fail(false);
            assert!(probe.read().is_ok());
        }

        #[test]
        fn test_shared_through_arc() {
            let probe = Arc::new(MockActivityProbe::new());
            let handle = Arc::clone(&probe);

            handle.set_input_secs_ago(10);

            assert_eq!(
                probe.read().unwrap().since_last_input,
                Duration::from_secs(10)
            );
            assert_eq!(probe.name(), "mock");
        }
    }

    #[test]
    fn test_unsupported_probe() {
        let probe = UnsupportedProbe;
        assert_eq!(probe.read(), Err(ProbeError::Unsupported));
        assert_eq!(probe.name(), "unsupported");
    }

    #[test]
    fn test_boxed_probe_delegates() {
        let probe: Box<dyn ActivityProbe + Send> = Box::new(UnsupportedProbe);
        assert_eq!(probe.name(), "unsupported");
        assert!(probe.read().is_err());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_platform_probe_is_unsupported_off_macos() {
        assert_eq!(platform_probe().name(), "unsupported");
    }
}
