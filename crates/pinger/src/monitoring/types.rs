use serde::{Deserialize, Serialize};

use crate::ERROR_MARKER;

/// How a single probe ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// A response arrived; carries its HTTP status code, whatever it is
    Success(u16),
    /// No response: timeout, refused connection, DNS failure and the like
    Failure(String),
}

/// Result of one probe against one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub outcome: ProbeOutcome,

    /// Wall-clock time of the request in milliseconds, `0` for failures
    pub duration_ms: u64,
}

impl ProbeResult {
    /// Mark the probe as answered with the given status code
    pub fn success(status_code: u16, duration_ms: u64) -> Self {
        Self { outcome: ProbeOutcome::Success(status_code), duration_ms }
    }

    /// Mark the probe as failed. Failed probes always report a zero duration.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self { outcome: ProbeOutcome::Failure(reason.into()), duration_ms: 0 }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Success(_))
    }
}

/// Last known status of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "code", rename_all = "snake_case")]
pub enum LastStatus {
    NotStarted,
    HttpStatus(u16),
    Error,
}

impl From<&ProbeOutcome> for LastStatus {
    fn from(outcome: &ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Success(code) => LastStatus::HttpStatus(*code),
            ProbeOutcome::Failure(_) => LastStatus::Error,
        }
    }
}

impl std::fmt::Display for LastStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LastStatus::NotStarted => write!(f, "-"),
            LastStatus::HttpStatus(code) => write!(f, "{code}"),
            LastStatus::Error => write!(f, "{ERROR_MARKER}"),
        }
    }
}
