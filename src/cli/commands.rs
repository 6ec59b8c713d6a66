//! Command definitions for the aware CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{seconds_to_duration, ConfigOverrides};

// ============================================================================
// CLI Structure
// ============================================================================

/// aware - tracks continuous activity and reminds you to take breaks
#[derive(Parser, Debug)]
#[command(
    name = "aware",
    version,
    about = "Tracks how long you have been at the computer and reminds you to take breaks",
    long_about = "Measures continuous active time from input events and display sleep.\n\
                  Idle stretches restart the session; a break reminder is raised once the\n\
                  session exceeds the configured limit.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Track the session in the foreground
    Run(RunArgs),

    /// Print the effective configuration as JSON
    Config {
        /// Settings file (defaults to <config dir>/aware/config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Take one activity reading and print it
    Probe,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command. All durations are in seconds.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Inactivity after which you count as idle
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub idle: Option<Duration>,

    /// Active time after which a break reminder is raised
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub limit: Option<Duration>,

    /// Minimum time between two reminders
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub snooze: Option<Duration>,

    /// Status refresh cadence while active
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub refresh: Option<Duration>,

    /// Settings file (defaults to <config dir>/aware/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show the session in the macOS menu bar instead of the terminal
    #[arg(short, long)]
    pub menubar: bool,
}

impl RunArgs {
    /// Command line values that take precedence over the settings file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            user_idle: self.idle,
            session_limit: self.limit,
            snooze_duration: self.snooze,
            refresh_interval: self.refresh,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a non-negative number of seconds (fractions allowed).
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;
    seconds_to_duration(seconds).ok_or_else(|| format!("'{}' must be a non-negative duration", s))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["aware"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["aware", "-v", "probe"]);
            assert!(cli.verbose);
            assert!(matches!(cli.command, Some(Commands::Probe)));
        }

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["aware", "run"]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert!(args.idle.is_none());
                    assert!(args.config.is_none());
                    assert!(!args.menubar);
                    assert_eq!(args.overrides(), ConfigOverrides::default());
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_with_options() {
            let cli = Cli::parse_from([
                "aware",
                "run",
                "--idle",
                "90",
                "--limit",
                "1500.5",
                "--snooze",
                "0",
                "--refresh",
                "30",
                "--config",
                "/tmp/aware.json",
                "--menubar",
            ]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    let overrides = args.overrides();
                    assert_eq!(overrides.user_idle, Some(Duration::from_secs(90)));
                    assert_eq!(overrides.session_limit, Some(Duration::from_millis(1_500_500)));
                    assert_eq!(overrides.snooze_duration, Some(Duration::ZERO));
                    assert_eq!(overrides.refresh_interval, Some(Duration::from_secs(30)));
                    assert_eq!(args.config, Some(PathBuf::from("/tmp/aware.json")));
                    assert!(args.menubar);
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_rejects_negative() {
            let result = Cli::try_parse_from(["aware", "run", "--idle", "-5"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_config_command() {
            let cli = Cli::parse_from(["aware", "config", "--config", "x.json"]);
            match cli.command {
                Some(Commands::Config { config }) => {
                    assert_eq!(config, Some(PathBuf::from("x.json")));
                }
                _ => panic!("Expected Config command"),
            }
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["aware", "completions", "zsh"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Zsh
                })
            ));
        }
    }

    mod parse_seconds_tests {
        use super::*;

        #[test]
        fn test_parse_seconds() {
            assert_eq!(parse_seconds("120"), Ok(Duration::from_secs(120)));
            assert_eq!(parse_seconds("0.5"), Ok(Duration::from_millis(500)));
        }

        #[test]
        fn test_parse_seconds_invalid() {
            assert!(parse_seconds("abc").is_err());
            assert!(parse_seconds("-1").is_err());
            assert!(parse_seconds("inf").is_err());
        }
    }
}
