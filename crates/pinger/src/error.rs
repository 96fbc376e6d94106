use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the monitor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one target URL must be configured")]
    NoTargets,
    #[error("invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
    #[error("target '{0}' is configured more than once")]
    DuplicateTarget(String),
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
    #[error("probe timeout must be between {min} and {max} seconds, got {got}")]
    TimeoutOutOfRange { got: u64, min: u64, max: u64 },
    #[error("no config directory available (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: IoError },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: IoError },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors raised by the ping log store
#[derive(Debug, Error)]
pub enum LogError {
    #[error("ping log {path} unavailable: {source}")]
    Io { path: PathBuf, source: IoError },
    #[error("failed to encode ping log row: {0}")]
    Encode(#[from] csv::Error),
}
