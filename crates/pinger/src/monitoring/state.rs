use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::RwLock;

use super::types::{LastStatus, ProbeResult};

/// Per-target counters, mutated only through [`SessionState::record_attempt`]
#[derive(Debug, Clone)]
struct Target {
    ping_count: u64,
    last_status: LastStatus,
    last_ping_at: Option<DateTime<Local>>,
    last_duration_ms: u64,
}

impl Target {
    fn new() -> Self {
        Self { ping_count: 0, last_status: LastStatus::NotStarted, last_ping_at: None, last_duration_ms: 0 }
    }
}

#[derive(Debug)]
struct Session {
    running: bool,
    started_at: Option<DateTime<Local>>,
    log_degraded: bool,
    /// Configuration order, used for snapshots
    order: Vec<String>,
    targets: HashMap<String, Target>,
}

/// Process-wide monitoring session: lifecycle flag plus every target's counters
///
/// All fields live behind one lock so a snapshot never mixes a new ping count
/// with a stale status.
#[derive(Debug)]
pub struct SessionState {
    inner: RwLock<Session>,
}

/// Point-in-time view of one target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSnapshot {
    pub url: String,
    pub status: LastStatus,
    pub ping_count: u64,
    pub last_ping: Option<DateTime<Local>>,
    pub last_duration_ms: u64,
}

/// Point-in-time view of the whole session
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub running: bool,
    pub started_at: Option<DateTime<Local>>,
    /// `HH:MM:SS` since start, `00:00:00` while stopped
    pub uptime: String,
    pub log_degraded: bool,
    pub targets: Vec<TargetSnapshot>,
}

impl MonitorSnapshot {
    /// Completed attempts across all targets
    pub fn total_ping_count(&self) -> u64 {
        self.targets.iter().map(|t| t.ping_count).sum()
    }

    /// Most recent completed attempt across all targets
    pub fn last_ping(&self) -> Option<DateTime<Local>> {
        self.targets.iter().filter_map(|t| t.last_ping).max()
    }

    pub fn target(&self, url: &str) -> Option<&TargetSnapshot> {
        self.targets.iter().find(|t| t.url == url)
    }
}

impl SessionState {
    /// Create a stopped session with a fresh entry for every URL
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order = Vec::new();
        let mut targets = HashMap::new();
        for url in urls {
            let url = url.into();
            if targets.insert(url.clone(), Target::new()).is_none() {
                order.push(url);
            }
        }

        Self {
            inner: RwLock::new(Session {
                running: false,
                started_at: None,
                log_degraded: false,
                order,
                targets,
            }),
        }
    }

    /// Record a completed attempt and return the target's new ping count
    ///
    /// Returns `None` for a URL that is not part of the session.
    pub async fn record_attempt(
        &self,
        url: &str,
        result: &ProbeResult,
        at: DateTime<Local>,
    ) -> Option<u64> {
        let mut session = self.inner.write().await;
        let target = session.targets.get_mut(url)?;

        target.ping_count += 1;
        target.last_status = LastStatus::from(&result.outcome);
        target.last_duration_ms = result.duration_ms;
        target.last_ping_at = Some(at);

        Some(target.ping_count)
    }

    pub(crate) async fn set_running(&self, at: DateTime<Local>) {
        let mut session = self.inner.write().await;
        session.running = true;
        session.started_at = Some(at);
    }

    pub(crate) async fn set_stopped(&self) {
        let mut session = self.inner.write().await;
        session.running = false;
        session.started_at = None;
    }

    /// Update the degraded-log flag, returning its previous value
    pub(crate) async fn set_log_degraded(&self, degraded: bool) -> bool {
        let mut session = self.inner.write().await;
        std::mem::replace(&mut session.log_degraded, degraded)
    }

    pub async fn snapshot(&self) -> MonitorSnapshot {
        self.snapshot_at(Local::now()).await
    }

    /// Snapshot with uptime measured against `now`
    pub async fn snapshot_at(&self, now: DateTime<Local>) -> MonitorSnapshot {
        let session = self.inner.read().await;

        let uptime = match (session.running, session.started_at) {
            (true, Some(started_at)) => {
                format_uptime((now - started_at).to_std().unwrap_or_default())
            }
            _ => format_uptime(Duration::ZERO),
        };

        let targets = session
            .order
            .iter()
            .filter_map(|url| {
                session.targets.get(url).map(|t| TargetSnapshot {
                    url: url.clone(),
                    status: t.last_status,
                    ping_count: t.ping_count,
                    last_ping: t.last_ping_at,
                    last_duration_ms: t.last_duration_ms,
                })
            })
            .collect();

        MonitorSnapshot {
            running: session.running,
            started_at: session.started_at,
            uptime,
            log_degraded: session.log_degraded,
            targets,
        }
    }
}

/// Format a duration as `HH:MM:SS`; hours keep counting past 23
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
