use actix_web::{HttpResponse, Responder, get, web};
use pinger::LastStatus;
use pinger::ping_log::format_timestamp;
use serde::Serialize;

use crate::state::AppState;

const NO_PING: &str = "-";

#[derive(Debug, Serialize)]
struct StatusResponse {
    running: bool,
    status: &'static str,
    uptime: String,
    /// Completed attempts across all targets
    ping_count: u64,
    last_ping: String,
    log_degraded: bool,
    targets: Vec<TargetStatus>,
}

#[derive(Debug, Serialize)]
struct TargetStatus {
    url: String,
    status: LastStatus,
    /// `status` as it appears in the log's status column
    last_status: String,
    ping_count: u64,
    last_ping: String,
    last_duration_ms: u64,
}

/// Current session and per-target counters. Never fails: broken targets show `Error`.
#[get("/status")]
pub async fn status_route(data: web::Data<AppState>) -> impl Responder {
    let snapshot = data.scheduler.state().snapshot().await;

    let targets = snapshot
        .targets
        .iter()
        .map(|target| TargetStatus {
            url: target.url.clone(),
            status: target.status,
            last_status: target.status.to_string(),
            ping_count: target.ping_count,
            last_ping: target.last_ping.as_ref().map_or_else(|| NO_PING.into(), format_timestamp),
            last_duration_ms: target.last_duration_ms,
        })
        .collect();

    HttpResponse::Ok().json(StatusResponse {
        running: snapshot.running,
        status: if snapshot.running { "Running" } else { "Stopped" },
        uptime: snapshot.uptime.clone(),
        ping_count: snapshot.total_ping_count(),
        last_ping: snapshot.last_ping().as_ref().map_or_else(|| NO_PING.into(), format_timestamp),
        log_degraded: snapshot.log_degraded,
        targets,
    })
}
