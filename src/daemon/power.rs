//! System sleep and wake notifications.
//!
//! On macOS, `NSWorkspace` posts `NSWorkspaceWillSleepNotification` and
//! `NSWorkspaceDidWakeNotification` on the main thread. [`observe_sleep_wake`]
//! registers a block for each on the workspace notification center; the
//! blocks forward a [`LifecycleSignal`] into the daemon loop's channel.
//!
//! Delivery happens while the main run loop turns. The menu bar pumps it
//! through `NSApplication`; the terminal display calls [`pump_main_run_loop`].
//!
//! ```ignore
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! let _observer = observe_sleep_wake(SignalForwarder::new(tx));
//! daemon.run(rx).await?;
//! ```

use tokio::sync::mpsc;

use super::runner::LifecycleSignal;

/// Name of the notification posted right before the system sleeps.
pub const WILL_SLEEP_NOTIFICATION: &str = "NSWorkspaceWillSleepNotification";

/// Name of the notification posted after the system wakes.
pub const DID_WAKE_NOTIFICATION: &str = "NSWorkspaceDidWakeNotification";

impl LifecycleSignal {
    /// Maps a workspace notification name to the signal it stands for.
    #[must_use]
    pub fn from_workspace_notification(name: &str) -> Option<Self> {
        match name {
            WILL_SLEEP_NOTIFICATION => Some(Self::Sleep),
            DID_WAKE_NOTIFICATION => Some(Self::Wake),
            _ => None,
        }
    }
}

// ============================================================================
// SignalForwarder
// ============================================================================

/// Sends lifecycle signals into the daemon loop from OS callbacks.
#[derive(Debug, Clone)]
pub struct SignalForwarder {
    tx: mpsc::UnboundedSender<LifecycleSignal>,
}

impl SignalForwarder {
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<LifecycleSignal>) -> Self {
        Self { tx }
    }

    /// Sends `signal`. Returns `false` once the loop has stopped listening.
    pub fn forward(&self, signal: LifecycleSignal) -> bool {
        match self.tx.send(signal) {
            Ok(()) => {
                tracing::debug!(signal = ?signal, "lifecycle signal forwarded");
                true
            }
            Err(_) => {
                tracing::debug!(signal = ?signal, "daemon loop gone, signal dropped");
                false
            }
        }
    }

    /// Forwards the signal for a workspace notification name.
    ///
    /// Unknown names are ignored and return `false`.
    pub fn forward_notification(&self, name: &str) -> bool {
        match LifecycleSignal::from_workspace_notification(name) {
            Some(signal) => self.forward(signal),
            None => {
                tracing::debug!(name, "ignoring workspace notification");
                false
            }
        }
    }
}

// ============================================================================
// Observer (macOS)
// ============================================================================

#[cfg(target_os = "macos")]
mod native {
    use std::ptr::NonNull;

    use block2::RcBlock;
    use objc2::rc::{autoreleasepool, Retained};
    use objc2::runtime::{AnyClass, AnyObject, Bool};
    use objc2::{class, msg_send};
    use objc2_foundation::NSString;

    use super::{SignalForwarder, DID_WAKE_NOTIFICATION, WILL_SLEEP_NOTIFICATION};

    /// Keeps the sleep/wake observers registered; removes them on drop.
    pub struct SleepWakeObserver {
        center: Retained<AnyObject>,
        tokens: Vec<Retained<AnyObject>>,
    }

    impl std::fmt::Debug for SleepWakeObserver {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SleepWakeObserver")
                .field("observers", &self.tokens.len())
                .finish()
        }
    }

    impl Drop for SleepWakeObserver {
        fn drop(&mut self) {
            for token in &self.tokens {
                let _: () = unsafe { msg_send![&*self.center, removeObserver: &**token] };
            }
        }
    }

    /// Registers sleep and wake observers on the workspace notification
    /// center. Returns `None` when AppKit is not loaded.
    pub fn observe_sleep_wake(forwarder: SignalForwarder) -> Option<SleepWakeObserver> {
        let Some(workspace_class) = AnyClass::get(c"NSWorkspace") else {
            tracing::warn!("NSWorkspace unavailable, relying on tick gaps to detect sleep");
            return None;
        };

        let workspace: Option<Retained<AnyObject>> =
            unsafe { msg_send![workspace_class, sharedWorkspace] };
        let workspace = workspace?;
        let center: Option<Retained<AnyObject>> =
            unsafe { msg_send![&*workspace, notificationCenter] };
        let center = center?;

        let mut tokens = Vec::with_capacity(2);
        for name in [WILL_SLEEP_NOTIFICATION, DID_WAKE_NOTIFICATION] {
            let forwarder = forwarder.clone();
            let block = RcBlock::new(move |_note: NonNull<AnyObject>| {
                forwarder.forward_notification(name);
            });
            let ns_name = NSString::from_str(name);

            let token: Option<Retained<AnyObject>> = unsafe {
                msg_send![
                    &*center,
                    addObserverForName: &*ns_name,
                    object: None::<&AnyObject>,
                    queue: None::<&AnyObject>,
                    usingBlock: &*block
                ]
            };
            match token {
                Some(token) => tokens.push(token),
                None => tracing::warn!(name, "failed to observe workspace notification"),
            }
        }

        tracing::debug!(observers = tokens.len(), "observing system sleep and wake");
        Some(SleepWakeObserver { center, tokens })
    }

    /// Lets the main run loop deliver pending sources without blocking.
    pub fn pump_main_run_loop() {
        autoreleasepool(|_| {
            let run_loop: Option<Retained<AnyObject>> =
                unsafe { msg_send![class!(NSRunLoop), mainRunLoop] };
            let until: Option<Retained<AnyObject>> =
                unsafe { msg_send![class!(NSDate), dateWithTimeIntervalSinceNow: 0.0f64] };
            let (Some(run_loop), Some(until)) = (run_loop, until) else {
                return;
            };

            let mode = NSString::from_str("kCFRunLoopDefaultMode");
            let _: Bool = unsafe { msg_send![&*run_loop, runMode: &*mode, beforeDate: &*until] };
        });
    }
}

#[cfg(target_os = "macos")]
pub use native::{observe_sleep_wake, pump_main_run_loop, SleepWakeObserver};

/// Stand-in for the macOS observer guard.
#[cfg(not(target_os = "macos"))]
#[derive(Debug)]
pub struct SleepWakeObserver;

/// Sleep and wake are not observed on this platform; tick gaps still
/// restart the session after a suspend.
#[cfg(not(target_os = "macos"))]
pub fn observe_sleep_wake(_forwarder: SignalForwarder) -> Option<SleepWakeObserver> {
    tracing::debug!("sleep/wake notifications are only observed on macOS");
    None
}

/// No-op outside macOS.
#[cfg(not(target_os = "macos"))]
pub fn pump_main_run_loop() {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod name_tests {
        use super::*;

        #[test]
        fn test_workspace_names_map_to_signals() {
            assert_eq!(
                LifecycleSignal::from_workspace_notification(WILL_SLEEP_NOTIFICATION),
                Some(LifecycleSignal::Sleep)
            );
            assert_eq!(
                LifecycleSignal::from_workspace_notification(DID_WAKE_NOTIFICATION),
                Some(LifecycleSignal::Wake)
            );
        }

        #[test]
        fn test_other_names_ignored() {
            assert_eq!(
                LifecycleSignal::from_workspace_notification("NSWorkspaceScreensDidSleepNotification"),
                None
            );
            assert_eq!(LifecycleSignal::from_workspace_notification(""), None);
        }
    }

    mod forwarder_tests {
        use super::*;

        #[test]
        fn test_forward_notification_sends_signal() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let forwarder = SignalForwarder::new(tx);

            assert!(forwarder.forward_notification(WILL_SLEEP_NOTIFICATION));
            assert!(forwarder.forward_notification(DID_WAKE_NOTIFICATION));

            assert_eq!(rx.try_recv().unwrap(), LifecycleSignal::Sleep);
            assert_eq!(rx.try_recv().unwrap(), LifecycleSignal::Wake);
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_unknown_notification_sends_nothing() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let forwarder = SignalForwarder::new(tx);

            assert!(!forwarder.forward_notification("NSWorkspaceDidLaunchApplicationNotification"));
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_forward_after_loop_stopped() {
            let (tx, rx) = mpsc::unbounded_channel();
            let forwarder = SignalForwarder::new(tx);
            drop(rx);

            assert!(!forwarder.forward(LifecycleSignal::Wake));
        }

        #[test]
        fn test_clones_share_channel() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let forwarder = SignalForwarder::new(tx);
            let clone = forwarder.clone();

            clone.forward(LifecycleSignal::Sleep);
            forwarder.forward(LifecycleSignal::Quit);

            assert_eq!(rx.try_recv().unwrap(), LifecycleSignal::Sleep);
            assert_eq!(rx.try_recv().unwrap(), LifecycleSignal::Quit);
        }
    }

    #[cfg(not(target_os = "macos"))]
    mod non_macos_tests {
        use super::*;

        #[test]
        fn test_observe_sleep_wake_unsupported() {
            let (tx, _rx) = mpsc::unbounded_channel();
            assert!(observe_sleep_wake(SignalForwarder::new(tx)).is_none());
            pump_main_run_loop();
        }
    }
}
