//! Title generation for the menu bar.
//!
//! The status item title cannot be drawn at reduced alpha through tray-icon,
//! so idle frames get a leading marker instead.

use crate::types::DisplayFrame;

/// Marker prepended to dimmed frames.
const IDLE_MARKER: &str = "💤";

// ============================================================================
// IconManager
// ============================================================================

/// Turns display frames into menu bar titles.
#[derive(Debug, Default)]
pub struct IconManager {
    /// Last title handed to the tray
    last_title: Option<String>,
}

impl IconManager {
    pub fn new() -> Self {
        Self { last_title: None }
    }

    /// Generates the title for a frame.
    ///
    /// ```
    /// use aware::menubar::icon::IconManager;
    /// use aware::types::DisplayFrame;
    ///
    /// let manager = IconManager::new();
    /// assert_eq!(manager.generate_title(&DisplayFrame::new("25m", false)), "25m");
    /// assert_eq!(manager.generate_title(&DisplayFrame::new("0m", true)), "💤 0m");
    /// ```
    pub fn generate_title(&self, frame: &DisplayFrame) -> String {
        if frame.dimmed {
            format!("{} {}", IDLE_MARKER, frame.text)
        } else {
            frame.text.clone()
        }
    }

    /// Returns the new title if it differs from the last one.
    pub fn title_if_changed(&mut self, frame: &DisplayFrame) -> Option<String> {
        let title = self.generate_title(frame);
        if self.last_title.as_deref() == Some(title.as_str()) {
            return None;
        }
        self.last_title = Some(title.clone());
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_title_active() {
        let manager = IconManager::new();
        let title = manager.generate_title(&DisplayFrame::new("1h 5m", false));
        assert_eq!(title, "1h 5m");
    }

    #[test]
    fn test_generate_title_dimmed() {
        let manager = IconManager::new();
        let title = manager.generate_title(&DisplayFrame::new("0m", true));
        assert_eq!(title, "💤 0m");
    }

    #[test]
    fn test_title_if_changed() {
        let mut manager = IconManager::new();
        let frame = DisplayFrame::new("3m", false);

        assert_eq!(manager.title_if_changed(&frame), Some("3m".to_string()));
        assert_eq!(manager.title_if_changed(&frame), None);
        assert_eq!(
            manager.title_if_changed(&DisplayFrame::new("3m", true)),
            Some("💤 3m".to_string())
        );
    }
}
