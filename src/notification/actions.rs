//! Notification action and category registration.
//!
//! Break reminders carry two buttons: "Dismiss" stops reminders for the rest
//! of the session, "Snooze" lets the normal cooldown run.

use objc2::rc::Retained;
use objc2_foundation::{NSArray, NSString};
use objc2_user_notifications::{
    UNNotificationAction, UNNotificationActionOptions, UNNotificationCategory,
    UNNotificationCategoryOptions,
};

use super::reminder::{action_ids, category_ids};

fn create_action(
    identifier: &str,
    title: &str,
    options: UNNotificationActionOptions,
) -> Retained<UNNotificationAction> {
    let identifier = NSString::from_str(identifier);
    let title = NSString::from_str(title);

    unsafe { UNNotificationAction::actionWithIdentifier_title_options(&identifier, &title, options) }
}

/// Creates the reminder category with its Dismiss and Snooze buttons.
///
/// `CustomDismissAction` makes the system report plain closes too, which the
/// delegate maps to [`ReminderAction::Closed`](super::ReminderAction::Closed).
#[must_use]
pub fn create_reminder_category() -> Retained<UNNotificationCategory> {
    let dismiss = create_action(
        action_ids::DISMISS,
        "Dismiss",
        UNNotificationActionOptions::Destructive,
    );
    let snooze = create_action(
        action_ids::SNOOZE,
        "Snooze",
        UNNotificationActionOptions::empty(),
    );

    let actions: Retained<NSArray<UNNotificationAction>> =
        NSArray::from_slice(&[dismiss.as_ref(), snooze.as_ref()]);
    let intent_identifiers: Retained<NSArray<NSString>> = NSArray::from_slice(&[] as &[&NSString]);
    let identifier = NSString::from_str(category_ids::BREAK_REMINDER);

    unsafe {
        UNNotificationCategory::categoryWithIdentifier_actions_intentIdentifiers_options(
            &identifier,
            &actions,
            &intent_identifiers,
            UNNotificationCategoryOptions::CustomDismissAction,
        )
    }
}
