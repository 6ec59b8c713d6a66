//! Notification content for break reminders.

use objc2::rc::Retained;
use objc2_foundation::NSString;
use objc2_user_notifications::{UNMutableNotificationContent, UNNotificationSound};

use super::reminder::{category_ids, BreakReminder};

/// Builds the notification content for `reminder`.
///
/// The title is the reminder headline, the body its detail line. The category
/// attaches the Dismiss and Snooze buttons registered at startup.
#[must_use]
pub fn create_reminder_content(reminder: &BreakReminder) -> Retained<UNMutableNotificationContent> {
    let title = NSString::from_str(&reminder.title);
    let body = NSString::from_str(&reminder.message);
    let category = NSString::from_str(category_ids::BREAK_REMINDER);

    let content = unsafe { UNMutableNotificationContent::new() };
    unsafe {
        content.setTitle(&title);
        content.setBody(&body);
        content.setCategoryIdentifier(&category);
        content.setSound(Some(&UNNotificationSound::defaultSound()));
    }
    content
}
