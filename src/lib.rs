//! aware library
//!
//! Tracks a continuous session of activity at the workstation and raises a
//! break reminder once it grows too long:
//! - Session tracking: idle detection, session clock, reminder throttling
//! - Activity probing (CoreGraphics on macOS)
//! - Session engine and daemon loop
//! - Break reminder delivery (native notifications on macOS)
//! - Menu bar display (macOS)
//! - Configuration file loading and CLI definitions

pub mod cli;
pub mod config;
pub mod daemon;
pub mod menubar;
pub mod notification;
pub mod probe;
pub mod session;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{ActivityReading, AwareConfig, DisplayFrame, Evaluation, SessionPhase};

pub use config::{load_config, ConfigError, ConfigOverrides};

pub use daemon::{
    Daemon, DisplaySink, LifecycleSignal, RecordingDisplay, ResetReason, SessionEngine,
    SessionEvent, SignalForwarder,
};

pub use notification::{
    BreakReminder, ConsoleNotificationSender, MockNotificationSender, NotificationError,
    NotificationSender, ReminderAction,
};
#[cfg(target_os = "macos")]
pub use notification::NotificationManager;

pub use probe::{platform_probe, ActivityProbe, MockActivityProbe, ProbeError, UnsupportedProbe};

pub use session::{
    long_form, short_form, Clock, ManualClock, NotificationThrottle, ReminderGate,
    SessionTracker, SystemClock,
};

pub use menubar::{MenuAction, TrayIconManager, TraySink};
