//! Pinger - periodic HTTP uptime monitoring
//!
//! This library holds the monitoring engine: a prober that times one GET
//! against a target, the in-memory session state that status queries read,
//! the append-only CSV ping log and the scheduler that ties them together.

pub mod config;
pub mod error;
pub mod monitoring;
pub mod ping_log;
pub mod validation;

// Re-export main types
pub use config::MonitorConfig;
pub use error::{ConfigError, LogError};
pub use monitoring::{
    Checker, HttpChecker, LastStatus, MonitorSnapshot, ProbeOutcome, ProbeResult, Scheduler,
    SessionState, TargetSnapshot,
};
pub use ping_log::{LogRecord, PingLog};

/// Re-export the HTTP client crate so callers can name its errors
pub use reqwest;

/// Outcome marker written to the log for failed attempts
pub const ERROR_MARKER: &str = "Error";

/// Default poll interval between scheduled cycles, in seconds
pub const DEFAULT_INTERVAL_SECONDS: u64 = 5 * 60;

/// Default per-probe timeout, in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
