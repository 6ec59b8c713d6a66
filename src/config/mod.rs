//! Configuration loading.
//!
//! Settings live in `<config_dir>/aware/config.json` as plain seconds:
//!
//! ```json
//! {
//!   "user_idle_seconds": 120,
//!   "session_limit_seconds": 1800,
//!   "snooze_duration_seconds": 300
//! }
//! ```
//!
//! Every key is read on its own. A missing, non-numeric, negative or
//! out-of-range value falls back to that key's default; the rest of the file
//! still applies. A missing file means all defaults.

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Map, Value};

pub use self::error::ConfigError;

use crate::types::{
    is_valid_cadence, AwareConfig, DEFAULT_IDLE_POLL_INTERVAL, DEFAULT_REFRESH_INTERVAL, DEFAULT_SESSION_LIMIT,
    DEFAULT_SNOOZE_DURATION, DEFAULT_USER_IDLE,
};

/// Directory under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "aware";

/// Settings file name.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Config file keys.
pub mod keys {
    pub const USER_IDLE: &str = "user_idle_seconds";
    pub const SESSION_LIMIT: &str = "session_limit_seconds";
    pub const SNOOZE_DURATION: &str = "snooze_duration_seconds";
    pub const REFRESH_INTERVAL: &str = "refresh_interval_seconds";
    pub const IDLE_POLL_INTERVAL: &str = "idle_poll_interval_seconds";
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the default settings file location.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    path.push(CONFIG_DIR_NAME);
    path.push(CONFIG_FILE_NAME);
    Ok(path)
}

/// Loads the configuration, never failing.
///
/// Uses `path` when given, otherwise [`default_config_path`]. Any error is
/// logged and replaced by the defaults.
pub fn load_config(path: Option<&Path>) -> AwareConfig {
    let resolved = match path {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    };

    let result = resolved.and_then(|path| load_from_path(&path));
    match result {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, suggestion = e.suggestion(), "using default configuration");
            AwareConfig::default()
        }
    }
}

/// Loads the configuration from `path`.
///
/// A missing file is not an error and yields the defaults.
pub fn load_from_path(path: &Path) -> Result<AwareConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        return Ok(AwareConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "loaded configuration file");
    parse_config(&text)
}

/// Parses configuration JSON, coercing each key independently.
pub fn parse_config(text: &str) -> Result<AwareConfig, ConfigError> {
    let value: Value = serde_json::from_str(text)?;
    let map = match value {
        Value::Object(map) => map,
        other => return Err(ConfigError::NotAnObject(json_kind(&other))),
    };

    let config = AwareConfig {
        user_idle: read_seconds(&map, keys::USER_IDLE, DEFAULT_USER_IDLE),
        session_limit: read_seconds(&map, keys::SESSION_LIMIT, DEFAULT_SESSION_LIMIT),
        snooze_duration: read_seconds(&map, keys::SNOOZE_DURATION, DEFAULT_SNOOZE_DURATION),
        refresh_interval: read_seconds(&map, keys::REFRESH_INTERVAL, DEFAULT_REFRESH_INTERVAL),
        idle_poll_interval: read_seconds(
            &map,
            keys::IDLE_POLL_INTERVAL,
            DEFAULT_IDLE_POLL_INTERVAL,
        ),
    };

    Ok(sanitize(config))
}

fn read_seconds(map: &Map<String, Value>, key: &str, default: Duration) -> Duration {
    let Some(value) = map.get(key) else {
        return default;
    };

    match value.as_f64().and_then(seconds_to_duration) {
        Some(duration) => duration,
        None => {
            tracing::warn!(key, value = %value, "ignoring invalid setting, using default");
            default
        }
    }
}

/// Converts user-supplied seconds, rejecting negative and non-finite values.
pub fn seconds_to_duration(seconds: f64) -> Option<Duration> {
    if seconds < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(seconds).ok()
}

/// Replaces cadences that fail [`AwareConfig::validate`] with their defaults.
pub fn sanitize(mut config: AwareConfig) -> AwareConfig {
    let Err(reason) = config.validate() else {
        return config;
    };
    tracing::warn!(%reason, "invalid scheduler cadence, using default");

    if !is_valid_cadence(config.refresh_interval) {
        config.refresh_interval = DEFAULT_REFRESH_INTERVAL;
    }
    if !is_valid_cadence(config.idle_poll_interval) {
        config.idle_poll_interval = DEFAULT_IDLE_POLL_INTERVAL;
    }
    config
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Per-key overrides, typically from command line flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub user_idle: Option<Duration>,
    pub session_limit: Option<Duration>,
    pub snooze_duration: Option<Duration>,
    pub refresh_interval: Option<Duration>,
}

impl ConfigOverrides {
    /// Applies the overrides on top of `config`.
    pub fn apply(&self, config: AwareConfig) -> AwareConfig {
        let config = AwareConfig {
            user_idle: self.user_idle.unwrap_or(config.user_idle),
            session_limit: self.session_limit.unwrap_or(config.session_limit),
            snooze_duration: self.snooze_duration.unwrap_or(config.snooze_duration),
            refresh_interval: self.refresh_interval.unwrap_or(config.refresh_interval),
            ..config
        };
        sanitize(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
