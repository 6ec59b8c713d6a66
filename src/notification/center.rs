//! UNUserNotificationCenter wrapper.

use std::cell::RefCell;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{Bool, ProtocolObject};
use objc2_foundation::{NSBundle, NSError, NSSet, NSString};
use objc2_user_notifications::{
    UNAuthorizationOptions, UNMutableNotificationContent, UNNotificationCategory,
    UNNotificationRequest, UNUserNotificationCenter, UNUserNotificationCenterDelegate,
};
use tokio::sync::oneshot;
use uuid::Uuid;

use super::error::NotificationError;

pub struct NotificationCenter;

impl NotificationCenter {
    #[must_use]
    pub fn current() -> Retained<UNUserNotificationCenter> {
        UNUserNotificationCenter::currentNotificationCenter()
    }

    /// Returns true when the process runs from a bundle with an identifier.
    ///
    /// `currentNotificationCenter` raises an Objective-C exception otherwise.
    pub fn has_bundle_identifier() -> bool {
        NSBundle::mainBundle().bundleIdentifier().is_some()
    }

    pub async fn request_authorization() -> Result<bool, NotificationError> {
        let (tx, rx) = oneshot::channel::<Result<bool, NotificationError>>();

        let options = UNAuthorizationOptions::Alert | UNAuthorizationOptions::Sound;

        let cb = RefCell::new(Some(tx));
        let block = RcBlock::new(move |granted: Bool, error: *mut NSError| {
            if let Some(sender) = cb.borrow_mut().take() {
                let result = match unsafe { error.as_ref() } {
                    Some(err) => Err(NotificationError::AuthorizationFailed(
                        err.localizedDescription().to_string(),
                    )),
                    None => Ok(granted.as_bool()),
                };
                let _ = sender.send(result);
            }
        });

        Self::current().requestAuthorizationWithOptions_completionHandler(options, &block);

        rx.await
            .map_err(|_| NotificationError::InitializationFailed("channel closed".to_string()))?
    }

    pub fn set_notification_categories(categories: &[Retained<UNNotificationCategory>]) {
        let refs: Vec<&UNNotificationCategory> = categories.iter().map(|c| c.as_ref()).collect();
        let categories_set: Retained<NSSet<UNNotificationCategory>> = NSSet::from_slice(&refs);

        Self::current().setNotificationCategories(&categories_set);
    }

    pub fn set_delegate(delegate: &ProtocolObject<dyn UNUserNotificationCenterDelegate>) {
        Self::current().setDelegate(Some(delegate));
    }

    /// Delivers `content` immediately under a fresh request identifier.
    pub async fn deliver(content: &UNMutableNotificationContent) -> Result<(), NotificationError> {
        let identifier = NSString::from_str(&Uuid::new_v4().to_string());
        let request =
            UNNotificationRequest::requestWithIdentifier_content_trigger(&identifier, content, None);

        Self::add_notification_request(&request).await
    }

    async fn add_notification_request(
        request: &UNNotificationRequest,
    ) -> Result<(), NotificationError> {
        let (tx, rx) = oneshot::channel::<Result<(), NotificationError>>();

        let cb = RefCell::new(Some(tx));
        let block = RcBlock::new(move |error: *mut NSError| {
            if let Some(sender) = cb.borrow_mut().take() {
                let result = match unsafe { error.as_ref() } {
                    Some(err) => Err(NotificationError::SendFailed(
                        err.localizedDescription().to_string(),
                    )),
                    None => Ok(()),
                };
                let _ = sender.send(result);
            }
        });

        Self::current().addNotificationRequest_withCompletionHandler(request, Some(&block));

        rx.await
            .map_err(|_| NotificationError::SendFailed("channel closed".to_string()))?
    }

    pub fn remove_all_delivered_notifications() {
        Self::current().removeAllDeliveredNotifications();
    }
}
