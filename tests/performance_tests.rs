//! Performance tests.
//!
//! A tick runs on the loop that also pumps UI events, so it has to stay far
//! below the UI pump cadence. Targets are generous to tolerate loaded CI
//! machines.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::mpsc;

use aware::session::{NotificationThrottle, SessionTracker};
use aware::{
    ActivityReading, AwareConfig, Daemon, ManualClock, MockActivityProbe,
    MockNotificationSender, RecordingDisplay, SessionEngine,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Performance measurement result.
#[derive(Debug)]
struct PerfResult {
    operation: String,
    duration_ms: u128,
    target_ms: u128,
    passed: bool,
}

impl PerfResult {
    fn new(operation: &str, duration: Duration, target_ms: u128) -> Self {
        let duration_ms = duration.as_millis();
        Self {
            operation: operation.to_string(),
            duration_ms,
            target_ms,
            passed: duration_ms <= target_ms,
        }
    }

    fn report_and_assert(&self) {
        eprintln!(
            "Performance: {} completed in {}ms (target: {}ms)",
            self.operation, self.duration_ms, self.target_ms
        );
        assert!(
            self.passed,
            "Performance test failed: {} took {}ms (target: {}ms)",
            self.operation, self.duration_ms, self.target_ms
        );
    }
}

// ============================================================================
// Session Core
// ============================================================================

#[test]
fn perf_tracker_and_throttle_100k_evaluations() {
    let start_at = SystemTime::UNIX_EPOCH;
    let mut tracker = SessionTracker::new(Duration::from_secs(120), start_at);
    let mut throttle =
        NotificationThrottle::new(Duration::from_secs(1_800), Duration::from_secs(300));

    let start = Instant::now();
    let mut reminders = 0u32;
    for i in 0..100_000u64 {
        let now = start_at + Duration::from_secs(i);
        let reading = ActivityReading::input_secs_ago(i % 200);
        let eval = tracker.evaluate(now, reading);
        if eval.is_idle() {
            throttle.arm();
        } else if throttle.should_notify(eval.session_duration, now) {
            throttle.record_shown(now);
            reminders += 1;
        }
    }
    let duration = start.elapsed();

    // Sessions never last long enough with input gaps cycling up to 199s
    assert_eq!(reminders, 0);
    PerfResult::new("100k tracker evaluations", duration, 200).report_and_assert();
}

#[test]
fn perf_engine_tick_latency() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let clock = ManualClock::at_epoch();
    let probe = Arc::new(MockActivityProbe::new());
    let mut engine = SessionEngine::new(AwareConfig::default(), clock.clone(), probe, tx);

    let start = Instant::now();
    for _ in 0..10_000 {
        clock.advance(Duration::from_secs(60));
        engine.tick().unwrap();
        while rx.try_recv().is_ok() {}
    }
    let duration = start.elapsed();

    PerfResult::new("10k engine ticks", duration, 500).report_and_assert();
}

// ============================================================================
// Daemon
// ============================================================================

#[tokio::test]
async fn perf_daemon_step_latency() {
    let clock = ManualClock::at_epoch();
    let display = RecordingDisplay::new();
    let mut daemon = Daemon::new(
        AwareConfig::default(),
        clock.clone(),
        Arc::new(MockActivityProbe::new()),
        MockNotificationSender::new(),
        display.clone(),
    );

    let start = Instant::now();
    for _ in 0..1_000 {
        clock.advance(Duration::from_secs(60));
        daemon.step().await.unwrap();
    }
    let duration = start.elapsed();

    assert_eq!(display.frames().len(), 1_000);
    PerfResult::new("1k daemon steps", duration, 500).report_and_assert();
}
