//! Session engine.
//!
//! One `tick` performs a complete evaluation cycle:
//! - wake detection from the wall-clock gap since the previous tick
//! - one probe reading (a failed read counts as active)
//! - session evaluation and throttle re-arming while idle
//! - event emission for the display and notification sinks
//!
//! The engine owns no timers. The daemon loop decides when to tick and asks
//! [`SessionEngine::poll_interval`] for the next cadence.

use std::fmt;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::config::sanitize;
use crate::notification::{BreakReminder, ReminderAction};
use crate::probe::ActivityProbe;
use crate::session::clock::elapsed_between;
use crate::session::{Clock, NotificationThrottle, ReminderGate, SessionTracker};
use crate::types::{ActivityReading, AwareConfig, DisplayFrame, Evaluation, SessionPhase};

/// Extra slack on top of the slowest cadence before a gap between two ticks
/// is treated as a sleep/wake cycle.
pub const WAKE_GAP_TOLERANCE: Duration = Duration::from_secs(30);

// ============================================================================
// SessionEvent
// ============================================================================

/// Why the session clock was restarted outside of idle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// The system is going to sleep
    Sleep,
    /// The system woke up
    Wake,
    /// The wall clock jumped further than any tick cadence explains
    ClockJump,
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetReason::Sleep => write!(f, "sleep"),
            ResetReason::Wake => write!(f, "wake"),
            ResetReason::ClockJump => write!(f, "clock jump"),
        }
    }
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A tick finished; sinks should show this frame
    Refreshed {
        /// Frame to display
        frame: DisplayFrame,
    },
    /// The user went idle
    IdleStarted,
    /// The user came back after an idle stretch
    ActivityResumed,
    /// A reminder should be delivered now
    ReminderDue {
        /// Reminder content
        reminder: BreakReminder,
    },
    /// The session clock was restarted by an external signal
    SessionReset {
        /// What triggered the reset
        reason: ResetReason,
    },
    /// The user dismissed reminders for the rest of the session
    RemindersDisabled,
}

// ============================================================================
// SessionEngine
// ============================================================================

/// Ties together the tracker, the throttle and their collaborators.
pub struct SessionEngine<C: Clock, P: ActivityProbe> {
    config: AwareConfig,
    tracker: SessionTracker,
    throttle: NotificationThrottle,
    clock: C,
    probe: P,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Phase seen on the previous tick (`None` before the first tick)
    last_phase: Option<SessionPhase>,
    last_tick_at: Option<SystemTime>,
    last_evaluation: Option<Evaluation>,
    /// Set while the probe keeps failing, so the warning is logged once
    probe_failing: bool,
}

impl<C: Clock, P: ActivityProbe> SessionEngine<C, P> {
    /// Creates an engine whose first session starts now.
    ///
    /// Cadences outside the schedulable range are replaced by their defaults.
    pub fn new(
        config: AwareConfig,
        clock: C,
        probe: P,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let config = sanitize(config);
        let tracker = SessionTracker::new(config.user_idle, clock.now());
        let throttle = NotificationThrottle::new(config.session_limit, config.snooze_duration);

        Self {
            config,
            tracker,
            throttle,
            clock,
            probe,
            event_tx,
            last_phase: None,
            last_tick_at: None,
            last_evaluation: None,
            probe_failing: false,
        }
    }

    /// Runs one evaluation cycle.
    ///
    /// # Errors
    ///
    /// Returns an error only if the event channel is closed.
    pub fn tick(&mut self) -> Result<Evaluation> {
        let now = self.clock.now();

        if self.woke_since_last_tick(now) {
            self.reset_at(now, ResetReason::ClockJump)?;
        }

        let reading = self.read_probe();
        let evaluation = self.tracker.evaluate(now, reading);

        if evaluation.is_idle() {
            self.throttle.arm();
        }

        match (self.last_phase, evaluation.phase) {
            (Some(SessionPhase::Active), SessionPhase::Idle) => {
                tracing::debug!("user went idle");
                self.send(SessionEvent::IdleStarted)?;
            }
            (Some(SessionPhase::Idle), SessionPhase::Active) => {
                tracing::debug!("user is back");
                self.send(SessionEvent::ActivityResumed)?;
            }
            _ => {}
        }

        self.send(SessionEvent::Refreshed {
            frame: DisplayFrame::from_evaluation(&evaluation),
        })?;

        if !evaluation.is_idle()
            && self
                .throttle
                .should_notify(evaluation.session_duration, now)
        {
            tracing::info!(
                session_secs = evaluation.session_duration.as_secs(),
                "break reminder due"
            );
            self.send(SessionEvent::ReminderDue {
                reminder: BreakReminder::for_session(evaluation.session_duration),
            })?;
        }

        self.last_phase = Some(evaluation.phase);
        self.last_tick_at = Some(now);
        self.last_evaluation = Some(evaluation);

        Ok(evaluation)
    }

    /// Restarts the session clock in response to a sleep or wake signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the event channel is closed.
    pub fn force_reset(&mut self, reason: ResetReason) -> Result<()> {
        let now = self.clock.now();
        self.reset_at(now, reason)
    }

    /// Starts the snooze window. Call after a due reminder was handed to the
    /// notification sink, whether or not delivery succeeded.
    pub fn record_reminder_shown(&mut self) {
        self.throttle.record_shown(self.clock.now());
    }

    /// Applies the user's response to a reminder.
    ///
    /// # Errors
    ///
    /// Returns an error if the event channel is closed.
    pub fn handle_reminder_action(&mut self, action: ReminderAction) -> Result<()> {
        tracing::info!(action = %action, "reminder action received");

        if action.disables_reminders() {
            self.throttle.disable();
            self.send(SessionEvent::RemindersDisabled)?;
        }

        Ok(())
    }

    /// Cadence for the next tick: fast while idle, to catch the user's return.
    pub fn poll_interval(&self) -> Duration {
        match self.last_phase {
            Some(SessionPhase::Idle) => self.config.idle_poll_interval,
            _ => self.config.refresh_interval,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AwareConfig {
        &self.config
    }

    /// Returns the result of the most recent tick.
    pub fn last_evaluation(&self) -> Option<Evaluation> {
        self.last_evaluation
    }

    /// Returns the current reminder gate.
    pub fn reminder_gate(&self) -> ReminderGate {
        self.throttle.gate()
    }

    /// Start of the current session.
    pub fn session_start(&self) -> SystemTime {
        self.tracker.session_start()
    }

    fn reset_at(&mut self, now: SystemTime, reason: ResetReason) -> Result<()> {
        tracing::info!(reason = %reason, "session reset");
        self.tracker.force_reset(now);
        self.last_tick_at = Some(now);
        self.send(SessionEvent::SessionReset { reason })
    }

    fn woke_since_last_tick(&self, now: SystemTime) -> bool {
        let Some(previous) = self.last_tick_at else {
            return false;
        };

        let slowest = self
            .config
            .refresh_interval
            .max(self.config.idle_poll_interval);
        let gap = elapsed_between(previous, now);

        if gap > slowest.saturating_add(WAKE_GAP_TOLERANCE) {
            tracing::debug!(gap_secs = gap.as_secs(), "wall-clock gap between ticks");
            return true;
        }
        false
    }

    fn read_probe(&mut self) -> ActivityReading {
        match self.probe.read() {
            Ok(reading) => {
                if self.probe_failing {
                    tracing::info!(probe = self.probe.name(), "activity probe recovered");
                    self.probe_failing = false;
                }
                reading
            }
            Err(e) => {
                if self.probe_failing {
                    tracing::debug!(probe = self.probe.name(), error = %e, "activity probe failed");
                } else {
                    tracing::warn!(
                        probe = self.probe.name(),
                        error = %e,
                        "activity probe failed, treating user as active"
                    );
                    self.probe_failing = true;
                }
                ActivityReading::active()
            }
        }
    }

    fn send(&self, event: SessionEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("Failed to send session event")
    }
}

// ============================================================================
// Tests
// ============================================================================
