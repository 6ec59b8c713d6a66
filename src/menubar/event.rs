//! Event handling for menu bar interactions.
//!
//! The event types and command mapping are platform-independent. Polling the
//! native menu event queue happens in the platform-specific code.

use std::fmt;

// ============================================================================
// MenuAction
// ============================================================================

/// Actions that can be triggered from the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Stop the tracker and exit
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Quit => write!(f, "quit"),
        }
    }
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for menu items.
///
/// On macOS, these map to the tray-icon menu ids captured at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    /// Quit menu item
    Quit,
    /// Title, status line or anything else that does not act
    Unknown,
}

impl MenuItemId {
    /// Converts a menu item ID to the corresponding action.
    pub fn to_action(&self) -> Option<MenuAction> {
        match self {
            MenuItemId::Quit => Some(MenuAction::Quit),
            MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Converts menu clicks to actions.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Processes a menu item click and returns the corresponding action.
    pub fn handle_click(&self, item_id: MenuItemId) -> Option<MenuAction> {
        let action = item_id.to_action();

        if let Some(ref action) = action {
            tracing::info!(action = %action, "menu action received");
        }

        action
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_action_display() {
        assert_eq!(format!("{}", MenuAction::Quit), "quit");
    }

    #[test]
    fn test_to_action() {
        assert_eq!(MenuItemId::Quit.to_action(), Some(MenuAction::Quit));
        assert_eq!(MenuItemId::Unknown.to_action(), None);
    }

    #[test]
    fn test_handle_click() {
        let handler = EventHandler::new();
        assert_eq!(handler.handle_click(MenuItemId::Quit), Some(MenuAction::Quit));
        assert_eq!(handler.handle_click(MenuItemId::Unknown), None);
    }
}
