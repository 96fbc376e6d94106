use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::validate_target_url;
use crate::{DEFAULT_INTERVAL_SECONDS, DEFAULT_TIMEOUT_SECONDS};

/// Shortest and longest accepted per-probe timeout, in seconds
pub const TIMEOUT_RANGE_SECONDS: (u64, u64) = (1, 60);

/// What to monitor and how often
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// URLs to ping, each one a separate target
    pub targets: Vec<String>,
    /// Poll interval between scheduled cycles
    pub interval_seconds: u64,
    /// Timeout for a single GET
    pub timeout_seconds: u64,
    /// Start monitoring as soon as the process is ready
    pub autostart: bool,
}

/// Where the ping log lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub path: PathBuf,
    /// File name offered to clients downloading the log
    pub download_name: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            targets: vec!["https://example.com".into()],
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            autostart: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("ping_logs.csv"), download_name: "ping_logs.csv".into() }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// More than one target means the log carries a URL column
    pub fn is_multi_target(&self) -> bool {
        self.targets.len() > 1
    }

    /// Check targets, interval and timeout before anything is scheduled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            validate_target_url(target)?;
            if !seen.insert(target.as_str()) {
                return Err(ConfigError::DuplicateTarget(target.clone()));
            }
        }

        if self.interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let (min, max) = TIMEOUT_RANGE_SECONDS;
        if !(min..=max).contains(&self.timeout_seconds) {
            return Err(ConfigError::TimeoutOutOfRange { got: self.timeout_seconds, min, max });
        }

        Ok(())
    }
}
