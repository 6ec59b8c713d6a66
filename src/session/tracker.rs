//! Session clock and idle detection.

use std::time::{Duration, SystemTime};

use crate::types::{ActivityReading, Evaluation, SessionPhase};

use super::clock::elapsed_between;

/// Tracks the start of the current continuous active session.
///
/// A session is the time since the last idle evaluation. Every idle tick moves
/// the start forward, not only the active-to-idle edge, so short bursts of
/// input during an otherwise idle stretch never add up toward the limit.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    user_idle: Duration,
    session_start: SystemTime,
}

impl SessionTracker {
    /// Creates a tracker whose session starts at `now`.
    pub fn new(user_idle: Duration, now: SystemTime) -> Self {
        Self {
            user_idle,
            session_start: now,
        }
    }

    /// Evaluates one probe reading taken at `now`.
    ///
    /// Idle when input is strictly older than the idle threshold or the
    /// display is asleep. Idle evaluations restart the session at `now` and
    /// report a zero duration.
    pub fn evaluate(&mut self, now: SystemTime, reading: ActivityReading) -> Evaluation {
        if reading.since_last_input > self.user_idle || reading.display_asleep {
            self.session_start = now;
            return Evaluation {
                phase: SessionPhase::Idle,
                session_duration: Duration::ZERO,
            };
        }

        // Wall clock moved backwards: keep session_start <= now.
        if now < self.session_start {
            tracing::debug!("clock moved backwards, clamping session start");
            self.session_start = now;
        }

        Evaluation {
            phase: SessionPhase::Active,
            session_duration: elapsed_between(self.session_start, now),
        }
    }

    /// Unconditionally restarts the session at `now`.
    pub fn force_reset(&mut self, now: SystemTime) {
        self.session_start = now;
    }

    /// Start of the current session.
    pub fn session_start(&self) -> SystemTime {
        self.session_start
    }

    /// Configured idle threshold.
    pub fn user_idle(&self) -> Duration {
        self.user_idle
    }
}

// ============================================================================
// Tests
// ============================================================================
