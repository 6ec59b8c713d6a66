//! Session state machine.
//!
//! This module contains the platform-independent core:
//! - `clock`: time sources (system and manual)
//! - `tracker`: idle detection and the session clock
//! - `throttle`: reminder cooldown and dismissal
//! - `format`: short and long duration text

pub mod clock;
pub mod format;
pub mod throttle;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{long_form, short_form};
pub use throttle::{NotificationThrottle, ReminderGate};
pub use tracker::SessionTracker;
