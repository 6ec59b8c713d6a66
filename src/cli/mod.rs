//! CLI module for aware.
//!
//! - `commands`: Command definitions using clap derive
//! - `display`: Terminal output and the terminal display sink

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs};
pub use display::{Display, TerminalDisplay};
