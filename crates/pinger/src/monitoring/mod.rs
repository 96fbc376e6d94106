/// Monitoring engine module - probes targets on a schedule
///
/// This module is responsible for:
/// - Executing timed HTTP GET probes
/// - Tracking per-target counters and the session lifecycle
/// - Arming and disarming one recurring job per target
pub mod checker;
pub mod scheduler;
pub mod state;
pub mod types;

pub use checker::{Checker, HttpChecker};
pub use scheduler::Scheduler;
pub use state::{MonitorSnapshot, SessionState, TargetSnapshot, format_uptime};
pub use types::{LastStatus, ProbeOutcome, ProbeResult};
