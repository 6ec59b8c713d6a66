//! Break reminder delivery.
//!
//! The session engine decides *when* a reminder is due; this module decides
//! *how* it reaches the user:
//!
//! - [`NotificationSender`]: the seam the daemon consumes
//! - `NotificationManager`: native macOS notifications with Dismiss/Snooze
//!   buttons (macOS only)
//! - [`ConsoleNotificationSender`]: prints reminders to stdout
//! - [`MockNotificationSender`]: records reminders for tests
//!
//! # Bundling and Signing
//!
//! macOS only serves processes that have a bundle identifier and a code
//! signature. A bare `aware` binary falls back to console reminders. Inside
//! an `.app` bundle, ad-hoc signing is enough for development:
//! ```bash
//! codesign --force --deep --sign - Aware.app
//! ```

#[cfg(target_os = "macos")]
mod actions;
#[cfg(target_os = "macos")]
mod center;
#[cfg(target_os = "macos")]
mod content;
#[cfg(target_os = "macos")]
mod delegate;
pub mod error;
pub mod reminder;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use self::error::NotificationError;
pub use self::reminder::{action_ids, category_ids, BreakReminder, ReminderAction};

#[cfg(target_os = "macos")]
pub use self::manager::NotificationManager;

// ============================================================================
// NotificationSender
// ============================================================================

/// Delivers break reminders and reports how the user responded.
#[allow(async_fn_in_trait)]
pub trait NotificationSender {
    /// Presents a reminder.
    async fn send_reminder(&self, reminder: &BreakReminder) -> Result<(), NotificationError>;
    /// Returns the next pending user response, if any.
    fn try_recv_action(&self) -> Option<ReminderAction>;
    fn is_available(&self) -> bool;
    /// Removes every delivered reminder.
    fn clear_all(&self);
}

// ============================================================================
// NotificationManager (macOS)
// ============================================================================

#[cfg(target_os = "macos")]
mod manager {
    use std::time::Duration;

    use crossbeam_channel::{Receiver, TryRecvError};
    use objc2::rc::Retained;
    use objc2::MainThreadMarker;

    use super::actions::create_reminder_category;
    use super::center::NotificationCenter;
    use super::content::create_reminder_content;
    use super::delegate::NotificationDelegate;
    use super::{BreakReminder, NotificationError, NotificationSender, ReminderAction};

    /// Maximum retry attempts for sending notifications.
    const MAX_RETRIES: u32 = 3;

    /// Delay between retry attempts.
    const RETRY_DELAY: Duration = Duration::from_millis(1000);

    /// Native notification center client.
    pub struct NotificationManager {
        action_receiver: Receiver<ReminderAction>,
        /// Retained so the center keeps a live delegate.
        _delegate: Retained<NotificationDelegate>,
    }

    impl NotificationManager {
        /// Requests authorization, installs the delegate and registers the
        /// reminder category.
        ///
        /// # Errors
        ///
        /// Returns an error if the process is not bundled, authorization is
        /// denied or the caller is not on the main thread.
        pub async fn new() -> Result<Self, NotificationError> {
            let mtm = MainThreadMarker::new().ok_or_else(|| {
                NotificationError::InitializationFailed(
                    "notifications must be initialized on the main thread".to_string(),
                )
            })?;

            if !NotificationCenter::has_bundle_identifier() {
                return Err(NotificationError::NotAvailable);
            }

            let granted = NotificationCenter::request_authorization().await?;
            if !granted {
                return Err(NotificationError::PermissionDenied);
            }

            let (sender, receiver) = crossbeam_channel::unbounded();

            let delegate = NotificationDelegate::new(mtm, sender);
            NotificationCenter::set_delegate(&NotificationDelegate::as_protocol(&delegate));
            NotificationCenter::set_notification_categories(&[create_reminder_category()]);

            Ok(Self {
                action_receiver: receiver,
                _delegate: delegate,
            })
        }

        /// Like [`new`](Self::new), but logs the failure and returns `None`
        /// so the caller can fall back to console reminders.
        pub async fn new_with_fallback() -> Option<Self> {
            match Self::new().await {
                Ok(manager) => Some(manager),
                Err(e) if e.is_permanent() => {
                    tracing::info!("notifications unavailable: {}", e);
                    tracing::info!("{}", e.suggestion());
                    None
                }
                Err(e) => {
                    tracing::warn!("notifications unavailable: {}", e);
                    tracing::info!("{}", e.suggestion());
                    None
                }
            }
        }

        async fn deliver_with_retry(
            &self,
            reminder: &BreakReminder,
        ) -> Result<(), NotificationError> {
            let content = create_reminder_content(reminder);
            let mut retries = 0;

            loop {
                match NotificationCenter::deliver(&content).await {
                    Ok(()) => return Ok(()),
                    Err(e) if retries < MAX_RETRIES => {
                        retries += 1;
                        tracing::warn!(
                            "notification delivery failed (retry {}/{}): {}",
                            retries,
                            MAX_RETRIES,
                            e
                        );
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    impl NotificationSender for NotificationManager {
        async fn send_reminder(&self, reminder: &BreakReminder) -> Result<(), NotificationError> {
            self.deliver_with_retry(reminder).await
        }

        fn try_recv_action(&self) -> Option<ReminderAction> {
            match self.action_receiver.try_recv() {
                Ok(action) => Some(action),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
            }
        }

        fn is_available(&self) -> bool {
            true
        }

        fn clear_all(&self) {
            NotificationCenter::remove_all_delivered_notifications();
        }
    }
}

// ============================================================================
// ConsoleNotificationSender
// ============================================================================

/// Prints reminders to stdout. Used when native notifications are unavailable.
#[derive(Debug, Default)]
pub struct ConsoleNotificationSender;

impl ConsoleNotificationSender {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSender for ConsoleNotificationSender {
    async fn send_reminder(&self, reminder: &BreakReminder) -> Result<(), NotificationError> {
        tracing::info!(session_secs = reminder.session_duration.as_secs(), "break reminder");
        println!("\n🔔 {}: {}", reminder.title, reminder.message);
        Ok(())
    }

    fn try_recv_action(&self) -> Option<ReminderAction> {
        None
    }

    fn is_available(&self) -> bool {
        true
    }

    fn clear_all(&self) {}
}

// ============================================================================
// MockNotificationSender
// ============================================================================

/// Records reminders and replays injected user responses.
#[derive(Debug)]
pub struct MockNotificationSender {
    reminders: Mutex<Vec<BreakReminder>>,
    actions: Mutex<Vec<ReminderAction>>,
    clear_calls: AtomicUsize,
    available: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationSender {
    #[must_use]
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
            actions: Mutex::new(Vec::new()),
            clear_calls: AtomicUsize::new(0),
            available: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Queues a user response for the next `try_recv_action`.
    pub fn inject_action(&self, action: ReminderAction) {
        self.actions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(action);
    }

    #[must_use]
    pub fn reminders(&self) -> Vec<BreakReminder> {
        self.reminders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    #[must_use]
    pub fn reminder_count(&self) -> usize {
        self.reminders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Number of `clear_all` calls so far.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

impl NotificationSender for MockNotificationSender {
    async fn send_reminder(&self, reminder: &BreakReminder) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("mock failure".to_string()));
        }
        self.reminders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(reminder.clone());
        Ok(())
    }

    fn try_recv_action(&self) -> Option<ReminderAction> {
        let mut actions = self.actions.lock().unwrap_or_else(|e| e.into_inner());
        if actions.is_empty() {
            None
        } else {
            Some(actions.remove(0))
        }
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn clear_all(&self) {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
    }
}
