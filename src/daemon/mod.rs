//! Daemon module for the session tracker.
//!
//! - `engine`: one evaluation cycle per tick, emitting [`SessionEvent`]s
//! - `runner`: the async loop that schedules ticks and feeds the sinks
//! - `power`: system sleep/wake notifications forwarded into the loop

pub mod engine;
pub mod power;
pub mod runner;

pub use engine::{ResetReason, SessionEngine, SessionEvent, WAKE_GAP_TOLERANCE};
pub use power::{observe_sleep_wake, SignalForwarder, SleepWakeObserver};
pub use runner::{Daemon, DisplaySink, LifecycleSignal, RecordingDisplay, UI_PUMP_INTERVAL};
