//! CoreGraphics-backed activity probe.

use std::time::Duration;

use super::error::ProbeError;
use super::{idle_seconds_to_duration, ActivityProbe};

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventSourceSecondsSinceLastEventType(state: i32, event_type: u32) -> f64;
    fn CGMainDisplayID() -> u32;
    fn CGDisplayIsAsleep(display: u32) -> u32;
}

/// kCGEventSourceStateCombinedSessionState
const COMBINED_SESSION_STATE: i32 = 0;

/// CGEventType values that count as user activity.
const ACTIVITY_EVENT_TYPES: [u32; 5] = [
    1,  // kCGEventLeftMouseDown
    3,  // kCGEventRightMouseDown
    5,  // kCGEventMouseMoved
    10, // kCGEventKeyDown
    22, // kCGEventScrollWheel
];

/// Reads last-input time and display sleep state from the window server.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreGraphicsProbe;

impl CoreGraphicsProbe {
    /// Creates the probe.
    pub fn new() -> Self {
        Self
    }
}

impl ActivityProbe for CoreGraphicsProbe {
    fn since_last_input(&self) -> Result<Duration, ProbeError> {
        let seconds = ACTIVITY_EVENT_TYPES
            .iter()
            .map(|&event_type| unsafe {
                CGEventSourceSecondsSinceLastEventType(COMBINED_SESSION_STATE, event_type)
            })
            .fold(f64::INFINITY, f64::min);

        idle_seconds_to_duration(seconds)
    }

    fn is_display_asleep(&self) -> Result<bool, ProbeError> {
        let asleep = unsafe { CGDisplayIsAsleep(CGMainDisplayID()) };
        Ok(asleep != 0)
    }

    fn name(&self) -> &'static str {
        "coregraphics"
    }
}
