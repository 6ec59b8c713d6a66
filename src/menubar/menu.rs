//! Menu configuration for the menu bar.
//!
//! The configuration logic is platform-independent. Native menu creation
//! using tray-icon is done in the platform-specific code.

use crate::types::DisplayFrame;

/// App name shown at the top of the menu.
pub const APP_TITLE: &str = "Aware";

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Display text for the menu item
    pub text: String,
    /// Whether the menu item is enabled (clickable)
    pub enabled: bool,
}

impl MenuItemConfig {
    pub fn new(text: impl Into<String>, enabled: bool) -> Self {
        Self {
            text: text.into(),
            enabled,
        }
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete menu configuration for one frame.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    /// App name (disabled)
    pub title: MenuItemConfig,
    /// Current status (disabled)
    pub status: MenuItemConfig,
    /// Quit button
    pub quit: MenuItemConfig,
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds menu configuration from a display frame.
#[derive(Debug, Default)]
pub struct MenuBuilder;

impl MenuBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, frame: &DisplayFrame) -> MenuConfig {
        MenuConfig {
            title: MenuItemConfig::new(APP_TITLE, false),
            status: self.build_status_item(frame),
            quit: MenuItemConfig::new("Quit", true),
        }
    }

    /// Status line: "Idle" or "Active for 12m".
    pub fn build_status_item(&self, frame: &DisplayFrame) -> MenuItemConfig {
        let text = if frame.dimmed {
            "Idle".to_string()
        } else {
            format!("Active for {}", frame.text)
        };
        MenuItemConfig::new(text, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_active() {
        let config = MenuBuilder::new().build(&DisplayFrame::new("12m", false));

        assert_eq!(config.title, MenuItemConfig::new("Aware", false));
        assert_eq!(config.status.text, "Active for 12m");
        assert!(!config.status.enabled);
        assert!(config.quit.enabled);
    }

    #[test]
    fn test_build_idle() {
        let config = MenuBuilder::new().build(&DisplayFrame::new("0m", true));
        assert_eq!(config.status.text, "Idle");
    }
}
