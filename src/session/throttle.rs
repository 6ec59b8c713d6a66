//! Break reminder throttling.
//!
//! The throttle cycles through three gates per session:
//!
//! ```text
//! Armed ──(reminder shown)──▶ ShownAt(t) ──(snooze elapsed)──▶ due again
//!   ▲                             │
//!   │                         (dismiss)
//!   │                             ▼
//!   └──────(idle: arm)────── Disabled
//! ```

use std::time::{Duration, SystemTime};

use super::clock::elapsed_between;

/// When a reminder was last shown.
///
/// `Armed` stands for "never" (minus infinity) and `Disabled` for "forever"
/// (plus infinity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderGate {
    /// No reminder shown since the last idle period
    Armed,
    /// A reminder was shown at this time
    ShownAt(SystemTime),
    /// The user dismissed reminders for the rest of this session
    Disabled,
}

impl ReminderGate {
    /// Returns the string representation of the gate.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderGate::Armed => "armed",
            ReminderGate::ShownAt(_) => "snoozed",
            ReminderGate::Disabled => "disabled",
        }
    }
}

/// Decides when a break reminder is due.
#[derive(Debug, Clone)]
pub struct NotificationThrottle {
    session_limit: Duration,
    snooze_duration: Duration,
    gate: ReminderGate,
}

impl NotificationThrottle {
    /// Creates an armed throttle.
    pub fn new(session_limit: Duration, snooze_duration: Duration) -> Self {
        Self {
            session_limit,
            snooze_duration,
            gate: ReminderGate::Armed,
        }
    }

    /// Returns true when the session has reached the limit and the snooze
    /// window since the last reminder has fully elapsed. Both bounds are
    /// inclusive.
    pub fn should_notify(&self, session_duration: Duration, now: SystemTime) -> bool {
        if session_duration < self.session_limit {
            return false;
        }

        match self.gate {
            ReminderGate::Armed => true,
            ReminderGate::ShownAt(shown) => elapsed_between(shown, now) >= self.snooze_duration,
            ReminderGate::Disabled => false,
        }
    }

    /// Records that a reminder was delivered at `now`.
    pub fn record_shown(&mut self, now: SystemTime) {
        self.gate = ReminderGate::ShownAt(now);
    }

    /// Re-arms the throttle; called when the user goes idle.
    pub fn arm(&mut self) {
        self.gate = ReminderGate::Armed;
    }

    /// Suppresses reminders until the next [`arm`](Self::arm).
    pub fn disable(&mut self) {
        self.gate = ReminderGate::Disabled;
    }

    /// Current gate.
    pub fn gate(&self) -> ReminderGate {
        self.gate
    }

    /// Returns true once the user dismissed reminders for this session.
    pub fn is_disabled(&self) -> bool {
        self.gate == ReminderGate::Disabled
    }
}

// ============================================================================
// Tests
// ============================================================================
