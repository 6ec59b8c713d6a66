//! Platform-independent reminder content and user responses.

use std::fmt;
use std::time::Duration;

use crate::session::format::long_form;

/// Reminder title.
pub const REMINDER_TITLE: &str = "Take a break";

/// Notification action identifiers.
pub mod action_ids {
    /// Action ID for "no more reminders this session".
    pub const DISMISS: &str = "DISMISS_ACTION";
    /// Action ID for "remind me again later".
    pub const SNOOZE: &str = "SNOOZE_ACTION";
}

/// Notification category identifiers.
pub mod category_ids {
    /// Category for break reminders.
    pub const BREAK_REMINDER: &str = "BREAK_REMINDER";
}

// ============================================================================
// BreakReminder
// ============================================================================

/// Text of a break reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakReminder {
    /// Headline
    pub title: String,
    /// Detail line, e.g. "You've been active for over 30 minutes."
    pub message: String,
    /// Session length the reminder was raised for
    pub session_duration: Duration,
}

impl BreakReminder {
    /// Builds the reminder for a session of the given length.
    pub fn for_session(session_duration: Duration) -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            message: format!("You've been active for over {}.", long_form(session_duration)),
            session_duration,
        }
    }
}

// ============================================================================
// ReminderAction
// ============================================================================

/// How the user responded to a delivered reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderAction {
    /// "Dismiss" button: no more reminders until the next idle period.
    Dismiss,
    /// "Snooze" button: the normal cooldown applies.
    Snooze,
    /// The notification body was clicked.
    Opened,
    /// The notification was closed without choosing an action.
    Closed,
}

impl ReminderAction {
    /// Maps a notification action identifier to an action.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            action_ids::DISMISS => Some(Self::Dismiss),
            action_ids::SNOOZE => Some(Self::Snooze),
            "com.apple.UNNotificationDefaultActionIdentifier" => Some(Self::Opened),
            "com.apple.UNNotificationDismissActionIdentifier" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Returns true if this response disables reminders for the session.
    pub fn disables_reminders(&self) -> bool {
        matches!(self, Self::Dismiss)
    }
}

impl fmt::Display for ReminderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderAction::Dismiss => write!(f, "dismiss"),
            ReminderAction::Snooze => write!(f, "snooze"),
            ReminderAction::Opened => write!(f, "opened"),
            ReminderAction::Closed => write!(f, "closed"),
        }
    }
}
