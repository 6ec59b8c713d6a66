//! Terminal output for the aware CLI.

use std::io::{self, Write};

use crate::daemon::DisplaySink;
use crate::menubar::MenuAction;
use crate::probe::ProbeError;
use crate::types::{ActivityReading, AwareConfig, DisplayFrame};

// ============================================================================
// Display
// ============================================================================

/// One-shot command output.
pub struct Display;

impl Display {
    /// Prints the effective configuration as pretty JSON.
    pub fn show_config(config: &AwareConfig) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(&config.to_json())?);
        Ok(())
    }

    /// Prints a probe reading.
    pub fn show_probe(probe_name: &str, reading: &ActivityReading) {
        println!("probe:            {}", probe_name);
        println!(
            "last input:       {:.1}s ago",
            reading.since_last_input.as_secs_f64()
        );
        println!(
            "display asleep:   {}",
            if reading.display_asleep { "yes" } else { "no" }
        );
    }

    /// Prints a probe failure with its suggestion.
    pub fn show_probe_error(error: &ProbeError) {
        eprintln!("error: {}", error);
        eprintln!("  {}", error.suggestion());
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}

// ============================================================================
// TerminalDisplay
// ============================================================================

/// Display sink that prints a status line whenever the frame changes.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    last: Option<DisplayFrame>,
}

impl TerminalDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Formats the status line for a frame.
    pub fn format_frame(frame: &DisplayFrame) -> String {
        if frame.dimmed {
            format!("idle ({})", frame.text)
        } else {
            format!("active {}", frame.text)
        }
    }
}

impl DisplaySink for TerminalDisplay {
    fn render(&mut self, frame: &DisplayFrame) {
        if self.last.as_ref() == Some(frame) {
            return;
        }

        let line = Self::format_frame(frame);
        let mut stdout = io::stdout().lock();
        if writeln!(stdout, "{}", line).and_then(|_| stdout.flush()).is_err() {
            tracing::debug!("stdout closed");
        }
        self.last = Some(frame.clone());
    }

    fn pump(&mut self) -> Option<MenuAction> {
        // Sleep/wake and notification callbacks arrive through the run loop
        crate::daemon::power::pump_main_run_loop();
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_frame() {
        assert_eq!(
            TerminalDisplay::format_frame(&DisplayFrame::new("1h 5m", false)),
            "active 1h 5m"
        );
        assert_eq!(
            TerminalDisplay::format_frame(&DisplayFrame::new("0m", true)),
            "idle (0m)"
        );
    }

    #[test]
    fn test_render_remembers_last_frame() {
        let mut display = TerminalDisplay::new();
        let frame = DisplayFrame::new("3m", false);

        display.render(&frame);
        display.render(&frame);

        assert_eq!(display.last, Some(frame));
    }

    #[test]
    fn test_show_functions_do_not_panic() {
        Display::show_config(&AwareConfig::default()).unwrap();
        Display::show_probe("mock", &ActivityReading::new(Duration::from_secs(3), false));
        Display::show_probe_error(&ProbeError::Unsupported);
        Display::show_error("Test error message");
    }
}
