use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use futures::future::join_all;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use super::checker::Checker;
use super::state::SessionState;
use super::types::ProbeOutcome;
use crate::ping_log::{LogRecord, PingLog};

/// Probe, state update and log append for one target
struct Cycle {
    checker: Arc<dyn Checker>,
    state: Arc<SessionState>,
    log: Arc<PingLog>,
}

impl Cycle {
    /// Run one cycle for `url` while holding that target's guard
    ///
    /// A cycle bound to a recurring job re-checks the job's cancel flag once
    /// it owns the guard and skips if the job was disarmed meanwhile.
    /// Returns the target's new ping count, `None` when skipped.
    async fn run(
        &self,
        url: &str,
        guard: &Mutex<()>,
        cancelled: Option<&watch::Receiver<bool>>,
    ) -> Option<u64> {
        let _cycle = guard.lock().await;
        if cancelled.is_some_and(|c| *c.borrow()) {
            debug!(url, "Skipping cycle for disarmed job");
            return None;
        }

        let result = self.checker.probe(url).await;
        let at = Local::now();
        let sequence_number = self.state.record_attempt(url, &result, at).await?;

        match &result.outcome {
            ProbeOutcome::Success(code) => debug!(
                url,
                status = code,
                duration_ms = result.duration_ms,
                ping = sequence_number,
                "Ping completed"
            ),
            ProbeOutcome::Failure(reason) => {
                warn!(url, ping = sequence_number, "Ping failed: {reason}")
            }
        }

        let record = LogRecord {
            url: url.to_string(),
            sequence_number,
            at,
            outcome: result.outcome,
            duration_ms: result.duration_ms,
        };

        match self.log.append(&record).await {
            Ok(()) => {
                if self.state.set_log_degraded(false).await {
                    info!("Ping log {} is writable again", self.log.path().display());
                }
            }
            Err(e) => {
                if self.state.set_log_degraded(true).await {
                    warn!(url, ping = sequence_number, "Ping log still unavailable: {e}");
                } else {
                    error!(
                        url,
                        ping = sequence_number,
                        "Ping log unavailable, continuing without it: {e}"
                    );
                }
            }
        }

        Some(sequence_number)
    }
}

/// An armed recurring timer for one target
struct Job {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Monitoring scheduler - owns one recurring job per target while running
///
/// `start` and `stop` serialize on the job table, which doubles as the
/// running flag: `Some` while running, `None` while stopped.
pub struct Scheduler {
    interval: Duration,
    cycle: Arc<Cycle>,
    /// Per-target guard keeping a target's cycles mutually exclusive
    targets: Vec<(String, Arc<Mutex<()>>)>,
    jobs: Mutex<Option<HashMap<String, Job>>>,
}

impl Scheduler {
    /// Create a stopped scheduler for the targets known to `state`
    pub fn new(
        targets: Vec<String>,
        interval: Duration,
        checker: Arc<dyn Checker>,
        state: Arc<SessionState>,
        log: Arc<PingLog>,
    ) -> Self {
        let targets = targets.into_iter().map(|url| (url, Arc::new(Mutex::new(())))).collect();

        Self {
            interval,
            cycle: Arc::new(Cycle { checker, state, log }),
            targets,
            jobs: Mutex::new(None),
        }
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.cycle.state
    }

    pub fn log(&self) -> &Arc<PingLog> {
        &self.cycle.log
    }

    /// Start monitoring; a no-op returning `false` when already running
    ///
    /// Every target gets one immediate cycle, completed before this returns,
    /// and then one recurring job firing every interval.
    pub async fn start(&self) -> bool {
        let mut jobs = self.jobs.lock().await;
        if jobs.is_some() {
            debug!("Start requested while already running");
            return false;
        }

        self.cycle.state.set_running(Local::now()).await;
        info!(
            targets = self.targets.len(),
            interval_secs = self.interval.as_secs(),
            "Monitoring started"
        );

        join_all(self.targets.iter().map(|(url, guard)| self.cycle.run(url, guard, None))).await;

        let armed = self
            .targets
            .iter()
            .map(|(url, guard)| (url.clone(), self.arm(url.clone(), Arc::clone(guard))))
            .collect();
        *jobs = Some(armed);

        true
    }

    /// Stop monitoring; a no-op returning `false` when already stopped
    ///
    /// No new cycle starts once this returns. Cycles already probing finish
    /// and are recorded as usual.
    pub async fn stop(&self) -> bool {
        let mut jobs = self.jobs.lock().await;
        let Some(armed) = jobs.take() else {
            debug!("Stop requested while already stopped");
            return false;
        };

        for (url, job) in armed {
            Self::disarm(&url, job).await;
        }

        self.cycle.state.set_stopped().await;
        info!("Monitoring stopped");

        true
    }

    pub async fn is_running(&self) -> bool {
        self.jobs.lock().await.is_some()
    }

    /// Targets that currently have an armed recurring job
    pub async fn armed_targets(&self) -> Vec<String> {
        let jobs = self.jobs.lock().await;
        let mut urls: Vec<String> = jobs.iter().flat_map(|armed| armed.keys().cloned()).collect();
        urls.sort();
        urls
    }

    fn arm(&self, url: String, guard: Arc<Mutex<()>>) -> Job {
        let (cancel, mut cancelled) = watch::channel(false);
        let cycle = Arc::clone(&self.cycle);
        let period = self.interval;

        let handle = tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            // An overrunning cycle swallows the ticks it covered
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.changed() => break,
                    _ = timer.tick() => {}
                }

                if cycle.run(&url, &guard, Some(&cancelled)).await.is_none() {
                    break;
                }
            }

            debug!(url, "Recurring job disarmed");
        });

        Job { cancel, handle }
    }

    async fn disarm(url: &str, job: Job) {
        if job.handle.is_finished() {
            match job.handle.await {
                Err(e) if e.is_panic() => error!(url, "Recurring job panicked: {e}"),
                _ => debug!(url, "Recurring job already gone"),
            }
            return;
        }

        // The receiver only disappears once the job has exited on its own
        if job.cancel.send(true).is_err() {
            debug!(url, "Recurring job already gone");
        }
    }
}
