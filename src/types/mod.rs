//! Core data types for the session tracker.
//!
//! This module defines:
//! - Runtime configuration with documented defaults
//! - Activity readings taken from the probe
//! - The per-tick evaluation result and the frame handed to display sinks

use std::time::Duration;

use serde::Serialize;

// ============================================================================
// Defaults
// ============================================================================

/// Inactivity after which the user is considered idle.
pub const DEFAULT_USER_IDLE: Duration = Duration::from_secs(2 * 60);

/// Active time after which a break reminder becomes eligible.
pub const DEFAULT_SESSION_LIMIT: Duration = Duration::from_secs(30 * 60);

/// Minimum spacing between two reminders.
pub const DEFAULT_SNOOZE_DURATION: Duration = Duration::from_secs(5 * 60);

/// Cadence at which the status title is refreshed while active.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Cadence at which the probe is polled while idle, to catch the user's return.
pub const DEFAULT_IDLE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Longest accepted tick cadence.
pub const MAX_CADENCE: Duration = Duration::from_secs(24 * 60 * 60);

/// Returns true if `interval` can drive the scheduler: non-zero and no longer
/// than [`MAX_CADENCE`].
pub fn is_valid_cadence(interval: Duration) -> bool {
    !interval.is_zero() && interval <= MAX_CADENCE
}

// ============================================================================
// SessionPhase
// ============================================================================

/// Whether the user is currently at the workstation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Input seen recently and the display is awake
    Active,
    /// No recent input, or the display is asleep
    Idle,
}

impl SessionPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Active => "active",
            SessionPhase::Idle => "idle",
        }
    }

    /// Returns true for [`SessionPhase::Idle`].
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionPhase::Idle)
    }
}

// ============================================================================
// AwareConfig
// ============================================================================

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwareConfig {
    /// Inactivity threshold after which the user is idle
    pub user_idle: Duration,
    /// Active duration after which a reminder becomes eligible
    pub session_limit: Duration,
    /// Minimum spacing between two reminders
    pub snooze_duration: Duration,
    /// Evaluation cadence while active
    pub refresh_interval: Duration,
    /// Evaluation cadence while idle
    pub idle_poll_interval: Duration,
}

impl Default for AwareConfig {
    fn default() -> Self {
        Self {
            user_idle: DEFAULT_USER_IDLE,
            session_limit: DEFAULT_SESSION_LIMIT,
            snooze_duration: DEFAULT_SNOOZE_DURATION,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            idle_poll_interval: DEFAULT_IDLE_POLL_INTERVAL,
        }
    }
}

impl AwareConfig {
    /// Sets the idle threshold.
    pub fn with_user_idle(mut self, user_idle: Duration) -> Self {
        self.user_idle = user_idle;
        self
    }

    /// Sets the session limit.
    pub fn with_session_limit(mut self, session_limit: Duration) -> Self {
        self.session_limit = session_limit;
        self
    }

    /// Sets the snooze duration.
    pub fn with_snooze_duration(mut self, snooze_duration: Duration) -> Self {
        self.snooze_duration = snooze_duration;
        self
    }

    /// Sets the active refresh cadence.
    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Sets the idle poll cadence.
    pub fn with_idle_poll_interval(mut self, idle_poll_interval: Duration) -> Self {
        self.idle_poll_interval = idle_poll_interval;
        self
    }

    /// Validates the scheduler cadence.
    ///
    /// The three session durations accept any value, zero included. The two
    /// cadences must satisfy [`is_valid_cadence`]: zero would spin the
    /// scheduler and anything past a day cannot be scheduled reliably.
    pub fn validate(&self) -> Result<(), String> {
        let problems: Vec<String> = [
            ("refresh interval", self.refresh_interval),
            ("idle poll interval", self.idle_poll_interval),
        ]
        .into_iter()
        .filter(|(_, interval)| !is_valid_cadence(*interval))
        .map(|(name, interval)| {
            format!(
                "{} must be greater than zero and at most {}s (got {}s)",
                name,
                MAX_CADENCE.as_secs(),
                interval.as_secs_f64()
            )
        })
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    /// Renders the configuration as JSON seconds, using the config file keys.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "user_idle_seconds": self.user_idle.as_secs_f64(),
            "session_limit_seconds": self.session_limit.as_secs_f64(),
            "snooze_duration_seconds": self.snooze_duration.as_secs_f64(),
            "refresh_interval_seconds": self.refresh_interval.as_secs_f64(),
            "idle_poll_interval_seconds": self.idle_poll_interval.as_secs_f64(),
        })
    }
}

// ============================================================================
// ActivityReading
// ============================================================================

/// One sample from the activity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityReading {
    /// Time since the most recent qualifying input event
    pub since_last_input: Duration,
    /// Whether the main display is asleep
    pub display_asleep: bool,
}

impl ActivityReading {
    /// Creates a reading.
    pub fn new(since_last_input: Duration, display_asleep: bool) -> Self {
        Self {
            since_last_input,
            display_asleep,
        }
    }

    /// Reading that shows fresh input and an awake display.
    ///
    /// Used in place of a failed probe read, so a broken probe never makes the
    /// user look idle.
    pub fn active() -> Self {
        Self::new(Duration::ZERO, false)
    }

    /// Reading with input `secs` seconds ago and the display awake.
    pub fn input_secs_ago(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs), false)
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Result of one tracker evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Active or idle
    pub phase: SessionPhase,
    /// Length of the current session (zero while idle)
    pub session_duration: Duration,
}

impl Evaluation {
    /// Returns true while idle.
    pub fn is_idle(&self) -> bool {
        self.phase.is_idle()
    }
}

// ============================================================================
// DisplayFrame
// ============================================================================

/// What a display sink should show after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Short-form session duration, e.g. "1h 5m"
    pub text: String,
    /// Draw the text dimmed (user is idle)
    pub dimmed: bool,
}

impl DisplayFrame {
    /// Creates a frame.
    pub fn new(text: impl Into<String>, dimmed: bool) -> Self {
        Self {
            text: text.into(),
            dimmed,
        }
    }

    /// Frame for an evaluation: short-form duration, dimmed while idle.
    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self::new(
            crate::session::format::short_form(evaluation.session_duration),
            evaluation.is_idle(),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
