//! Daemon loop.
//!
//! Serializes everything that can touch the session state onto one task:
//! evaluation ticks, sleep/wake signals, notification responses and menu
//! clicks. The tick cadence follows [`SessionEngine::poll_interval`], so the
//! loop polls quickly while the user is away and slowly while they work.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};

use super::engine::{ResetReason, SessionEngine, SessionEvent};
use crate::menubar::MenuAction;
use crate::notification::NotificationSender;
use crate::probe::ActivityProbe;
use crate::session::Clock;
use crate::types::{AwareConfig, DisplayFrame};

/// Cadence at which the display sink is pumped for UI events.
pub const UI_PUMP_INTERVAL: Duration = Duration::from_millis(250);

// ============================================================================
// LifecycleSignal
// ============================================================================

/// External signals delivered into the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleSignal {
    /// The system is about to sleep
    Sleep,
    /// The system woke up
    Wake,
    /// Stop the loop
    Quit,
}

// ============================================================================
// DisplaySink
// ============================================================================

/// Where display frames go.
pub trait DisplaySink {
    /// Shows a frame. Called once per tick.
    fn render(&mut self, frame: &DisplayFrame);

    /// Processes pending UI work and returns a menu action if the user chose one.
    fn pump(&mut self) -> Option<MenuAction> {
        None
    }

    /// Tears the display down before exit.
    fn shutdown(&mut self) {}
}

impl<D: DisplaySink + ?Sized> DisplaySink for Box<D> {
    fn render(&mut self, frame: &DisplayFrame) {
        (**self).render(frame)
    }

    fn pump(&mut self) -> Option<MenuAction> {
        (**self).pump()
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

/// Display sink that records frames; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    frames: Arc<Mutex<Vec<DisplayFrame>>>,
    pending_action: Arc<Mutex<Option<MenuAction>>>,
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames rendered so far.
    #[must_use]
    pub fn frames(&self) -> Vec<DisplayFrame> {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<DisplayFrame> {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    /// Makes the next `pump` report `action`, as if the user clicked it.
    pub fn click(&self, action: MenuAction) {
        *self
            .pending_action
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(action);
    }
}

impl DisplaySink for RecordingDisplay {
    fn render(&mut self, frame: &DisplayFrame) {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(frame.clone());
    }

    fn pump(&mut self) -> Option<MenuAction> {
        self.pending_action
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

// ============================================================================
// Daemon
// ============================================================================

/// Owns the engine and its sinks and drives them.
pub struct Daemon<C, P, N, D>
where
    C: Clock,
    P: ActivityProbe,
    N: NotificationSender,
    D: DisplaySink,
{
    engine: SessionEngine<C, P>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    notifier: N,
    display: D,
}

impl<C, P, N, D> Daemon<C, P, N, D>
where
    C: Clock,
    P: ActivityProbe,
    N: NotificationSender,
    D: DisplaySink,
{
    /// Creates a daemon; the first session starts now.
    pub fn new(config: AwareConfig, clock: C, probe: P, notifier: N, display: D) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let engine = SessionEngine::new(config, clock, probe, event_tx);

        Self {
            engine,
            events,
            notifier,
            display,
        }
    }

    pub fn engine(&self) -> &SessionEngine<C, P> {
        &self.engine
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Runs one tick and dispatches everything it produced.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine's event channel is closed.
    pub async fn step(&mut self) -> Result<()> {
        self.poll_reminder_actions()?;
        self.engine.tick()?;
        self.dispatch_events().await
    }

    /// Applies a lifecycle signal. Returns `false` once the loop should stop.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine's event channel is closed.
    pub async fn handle_signal(&mut self, signal: LifecycleSignal) -> Result<bool> {
        tracing::debug!(signal = ?signal, "lifecycle signal");

        match signal {
            LifecycleSignal::Sleep => {
                self.engine.force_reset(ResetReason::Sleep)?;
                self.dispatch_events().await?;
            }
            LifecycleSignal::Wake => {
                self.engine.force_reset(ResetReason::Wake)?;
                self.step().await?;
            }
            LifecycleSignal::Quit => return Ok(false),
        }

        Ok(true)
    }

    /// Runs until Ctrl-C, a `Quit` signal or the menu's Quit item.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine's event channel is closed.
    pub async fn run(self, signals: mpsc::UnboundedReceiver<LifecycleSignal>) -> Result<()> {
        self.run_until(signals, tokio::signal::ctrl_c()).await
    }

    /// Runs until `shutdown` completes, a `Quit` signal or the menu's Quit item.
    ///
    /// `shutdown` is polled across the whole run, including while a tick is
    /// waiting on notification delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine's event channel is closed.
    pub async fn run_until<F>(
        mut self,
        mut signals: mpsc::UnboundedReceiver<LifecycleSignal>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future,
    {
        tokio::pin!(shutdown);

        let mut cadence = self.engine.poll_interval();
        let mut ticker = new_ticker(interval(cadence));
        let mut ui = new_ticker(interval(UI_PUMP_INTERVAL));

        tracing::info!(
            refresh_secs = self.engine.config().refresh_interval.as_secs(),
            "session tracking started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.step().await?;

                    let next = self.engine.poll_interval();
                    if next != cadence {
                        tracing::debug!(secs = next.as_secs_f64(), "tick cadence changed");
                        cadence = next;
                        ticker = new_ticker(interval_at(Instant::now() + next, next));
                    }
                }
                Some(signal) = signals.recv() => {
                    if !self.handle_signal(signal).await? {
                        break;
                    }
                }
                _ = ui.tick() => {
                    if let Some(MenuAction::Quit) = self.display.pump() {
                        tracing::info!("quit requested from menu");
                        break;
                    }
                    self.poll_reminder_actions()?;
                    self.dispatch_events().await?;
                }
                _ = &mut shutdown => {
                    tracing::info!("interrupted");
                    break;
                }
            }
        }

        self.display.shutdown();
        Ok(())
    }

    fn poll_reminder_actions(&mut self) -> Result<()> {
        while let Some(action) = self.notifier.try_recv_action() {
            self.engine.handle_reminder_action(action)?;
        }
        Ok(())
    }

    async fn dispatch_events(&mut self) -> Result<()> {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Refreshed { frame } => self.display.render(&frame),
                SessionEvent::ReminderDue { reminder } => {
                    if self.notifier.is_available() {
                        if let Err(e) = self.notifier.send_reminder(&reminder).await {
                            tracing::warn!("failed to deliver reminder: {}", e);
                        }
                    } else {
                        tracing::warn!("notifications unavailable, reminder skipped");
                    }
                    self.engine.record_reminder_shown();
                }
                SessionEvent::RemindersDisabled => self.notifier.clear_all(),
                other @ (SessionEvent::IdleStarted
                | SessionEvent::ActivityResumed
                | SessionEvent::SessionReset { .. }) => {
                    tracing::debug!(event = ?other, "session event");
                }
            }
        }
        Ok(())
    }
}

fn new_ticker(mut ticker: Interval) -> Interval {
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::notification::{MockNotificationSender, ReminderAction};
    use crate::probe::MockActivityProbe;
    use crate::session::{ManualClock, ReminderGate};

    type TestDaemon =
        Daemon<ManualClock, Arc<MockActivityProbe>, MockNotificationSender, RecordingDisplay>;

    fn create_daemon() -> (TestDaemon, ManualClock, Arc<MockActivityProbe>, RecordingDisplay) {
        let clock = ManualClock::at_epoch();
        let probe = Arc::new(MockActivityProbe::new());
        let display = RecordingDisplay::new();
        let daemon = Daemon::new(
            AwareConfig::default(),
            clock.clone(),
            Arc::clone(&probe),
            MockNotificationSender::new(),
            display.clone(),
        );
        (daemon, clock, probe, display)
    }

    async fn run_minutes(daemon: &mut TestDaemon, clock: &ManualClock, minutes: u32) {
        for _ in 0..minutes {
            clock.advance(Duration::from_secs(60));
            daemon.step().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_step_renders_frame() {
        let (mut daemon, clock, _probe, display) = create_daemon();

        daemon.step().await.unwrap();
        run_minutes(&mut daemon, &clock, 5).await;

        assert_eq!(display.frames().len(), 6);
        assert_eq!(display.last_frame(), Some(DisplayFrame::new("5m", false)));
    }

    #[tokio::test]
    async fn test_reminder_delivered_once_per_snooze() {
        let (mut daemon, clock, _probe, _display) = create_daemon();

        daemon.step().await.unwrap();
        run_minutes(&mut daemon, &clock, 30).await;
        assert_eq!(daemon.notifier().reminder_count(), 1);

        run_minutes(&mut daemon, &clock, 4).await;
        assert_eq!(daemon.notifier().reminder_count(), 1);

        run_minutes(&mut daemon, &clock, 1).await;
        assert_eq!(daemon.notifier().reminder_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_snoozes() {
        let (mut daemon, clock, _probe, _display) = create_daemon();
        daemon.notifier().set_should_fail(true);

        daemon.step().await.unwrap();
        run_minutes(&mut daemon, &clock, 30).await;

        assert!(matches!(
            daemon.engine().reminder_gate(),
            ReminderGate::ShownAt(_)
        ));
    }

    #[tokio::test]
    async fn test_dismiss_clears_and_disables() {
        let (mut daemon, clock, _probe, _display) = create_daemon();

        daemon.step().await.unwrap();
        run_minutes(&mut daemon, &clock, 30).await;
        daemon.notifier().inject_action(ReminderAction::Dismiss);

        run_minutes(&mut daemon, &clock, 20).await;

        assert_eq!(daemon.engine().reminder_gate(), ReminderGate::Disabled);
        assert_eq!(daemon.notifier().reminder_count(), 1);
        assert_eq!(daemon.notifier().clear_count(), 1);
    }

    #[tokio::test]
    async fn test_idle_dims_display() {
        let (mut daemon, clock, probe, display) = create_daemon();

        daemon.step().await.unwrap();
        probe.set_input_secs_ago(600);
        run_minutes(&mut daemon, &clock, 1).await;

        assert_eq!(display.last_frame(), Some(DisplayFrame::new("0m", true)));
    }

    #[tokio::test]
    async fn test_sleep_and_wake_signals() {
        let (mut daemon, clock, _probe, display) = create_daemon();
        daemon.step().await.unwrap();
        run_minutes(&mut daemon, &clock, 10).await;

        assert!(daemon.handle_signal(LifecycleSignal::Sleep).await.unwrap());
        clock.advance(Duration::from_secs(30));
        assert!(daemon.handle_signal(LifecycleSignal::Wake).await.unwrap());

        assert_eq!(daemon.engine().session_start(), clock.now());
        assert_eq!(display.last_frame(), Some(DisplayFrame::new("0m", false)));
    }

    #[tokio::test]
    async fn test_quit_signal() {
        let (mut daemon, _clock, _probe, _display) = create_daemon();
        assert!(!daemon.handle_signal(LifecycleSignal::Quit).await.unwrap());
    }

    #[tokio::test]
    async fn test_run_stops_on_quit_signal() {
        let (daemon, _clock, _probe, _display) = create_daemon();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(LifecycleSignal::Quit).unwrap();

        let result = daemon.run(rx).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_stops_on_menu_quit() {
        let (daemon, _clock, _probe, display) = create_daemon();
        let (_tx, rx) = mpsc::unbounded_channel();
        display.click(MenuAction::Quit);

        let result = daemon.run(rx).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_until_stops_when_shutdown_completes() {
        let (daemon, _clock, _probe, display) = create_daemon();
        let (_tx, rx) = mpsc::unbounded_channel();

        let shutdown = tokio::time::sleep(Duration::from_millis(20));
        daemon.run_until(rx, shutdown).await.unwrap();

        assert!(!display.frames().is_empty());
    }

    #[tokio::test]
    async fn test_huge_refresh_interval_does_not_overflow_ticker() {
        let clock = ManualClock::at_epoch();
        let probe = Arc::new(MockActivityProbe::new());
        let display = RecordingDisplay::new();
        let config = AwareConfig::default()
            .with_refresh_interval(Duration::from_secs(u64::MAX))
            .with_idle_poll_interval(Duration::from_millis(10));
        let daemon = Daemon::new(
            config,
            clock,
            Arc::clone(&probe),
            MockNotificationSender::new(),
            display.clone(),
        );
        assert_eq!(
            daemon.engine().config().refresh_interval,
            crate::types::DEFAULT_REFRESH_INTERVAL
        );

        // Idle on the first tick, active again after a few fast polls, which
        // switches the ticker back to the refresh cadence.
        probe.set_input_secs_ago(600);
        let (_tx, rx) = mpsc::unbounded_channel();
        let toggle = async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            probe.set_input_secs_ago(0);
            tokio::time::sleep(Duration::from_millis(60)).await;
        };

        daemon.run_until(rx, toggle).await.unwrap();

        let frames = display.frames();
        assert!(frames.iter().any(|frame| frame.dimmed));
        assert_eq!(frames.last().map(|frame| frame.dimmed), Some(false));
    }

    #[tokio::test]
    async fn test_forwarded_workspace_notifications_restart_session() {
        use crate::daemon::power::{SignalForwarder, DID_WAKE_NOTIFICATION, WILL_SLEEP_NOTIFICATION};

        let (mut daemon, clock, _probe, display) = create_daemon();
        daemon.step().await.unwrap();
        run_minutes(&mut daemon, &clock, 10).await;
        assert_eq!(display.last_frame(), Some(DisplayFrame::new("10m", false)));

        let (tx, rx) = mpsc::unbounded_channel();
        let forwarder = SignalForwarder::new(tx);
        assert!(forwarder.forward_notification(WILL_SLEEP_NOTIFICATION));
        assert!(forwarder.forward_notification(DID_WAKE_NOTIFICATION));
        assert!(forwarder.forward(LifecycleSignal::Quit));

        daemon.run(rx).await.unwrap();

        assert_eq!(display.last_frame(), Some(DisplayFrame::new("0m", false)));
    }
}
