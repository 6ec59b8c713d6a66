//! Notification system error types.
//!
//! Delivery failures never stop the session tracker; they are logged and the
//! reminder is treated as shown so the snooze window still applies.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to request notification authorization from the system.
    #[error("failed to request notification permission: {0}")]
    AuthorizationFailed(String),

    /// Failed to send a notification.
    #[error("failed to deliver notification: {0}")]
    SendFailed(String),

    /// Notification permission was denied by the user.
    #[error("notification permission denied")]
    PermissionDenied,

    /// Failed to initialize the notification system.
    #[error("failed to initialize notifications: {0}")]
    InitializationFailed(String),

    /// The process has no bundle identifier, so the notification center
    /// refuses to serve it.
    #[error("notification center is not available outside an app bundle")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns true if retrying later cannot help.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::NotAvailable)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "allow notifications for aware in System Settings > Notifications"
            }
            Self::SendFailed(_) => "check the notification center",
            Self::InitializationFailed(_) => "restart aware",
            Self::NotAvailable => {
                "run aware from a signed .app bundle for native reminders; printing them instead"
            }
        }
    }
}
