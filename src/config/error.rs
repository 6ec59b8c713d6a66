//! Configuration loading error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading the configuration file.
///
/// None of these stop the program: callers fall back to the defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no configuration directory.
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON in configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file is JSON but not an object of settings.
    #[error("configuration must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

impl ConfigError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NoConfigDir => "pass --config with an explicit path",
            Self::Read { .. } => "check the file permissions",
            Self::Parse(_) | Self::NotAnObject(_) => {
                "write the file as {\"session_limit_seconds\": 1800, ...}"
            }
        }
    }
}
