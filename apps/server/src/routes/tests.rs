use std::sync::Arc;
use std::time::Duration;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use pinger::{Checker, PingLog, ProbeResult, Scheduler, SessionState};
use serde_json::Value;
use tempfile::{TempDir, tempdir};

use crate::state::AppState;

const UP: &str = "https://up.example";
const DOWN: &str = "https://down.example";

/// Answers 200 for every target except `DOWN`
struct FixedChecker;

#[async_trait::async_trait]
impl Checker for FixedChecker {
    async fn probe(&self, target: &str) -> ProbeResult {
        if target == DOWN {
            ProbeResult::failure("connection refused")
        } else {
            ProbeResult::success(200, 12)
        }
    }
}

fn app_state_with_log(targets: &[&str], log_path: std::path::PathBuf) -> web::Data<AppState> {
    let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
    let state = Arc::new(SessionState::new(targets.clone()));
    let log = Arc::new(PingLog::new(log_path, targets.len() > 1));
    let scheduler =
        Scheduler::new(targets, Duration::from_secs(300), Arc::new(FixedChecker), state, log);

    web::Data::new(AppState { scheduler: Arc::new(scheduler), download_name: "ping_logs.csv".into() })
}

fn app_state(targets: &[&str]) -> (web::Data<AppState>, TempDir) {
    let dir = tempdir().unwrap();
    let state = app_state_with_log(targets, dir.path().join("ping_logs.csv"));
    (state, dir)
}

macro_rules! service {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(super::routes)).await
    };
}

#[actix_web::test]
async fn test_health() {
    let (state, _dir) = app_state(&[UP]);
    let app = service!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_status_before_start() {
    let (state, _dir) = app_state(&[UP]);
    let app = service!(state);

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/status").to_request()).await;

    assert_eq!(body["running"], false);
    assert_eq!(body["status"], "Stopped");
    assert_eq!(body["uptime"], "00:00:00");
    assert_eq!(body["ping_count"], 0);
    assert_eq!(body["last_ping"], "-");
    assert_eq!(body["targets"][0]["url"], UP);
    assert_eq!(body["targets"][0]["status"]["state"], "not_started");
}

#[actix_web::test]
async fn test_repeated_start_pings_once() {
    let (state, _dir) = app_state(&[UP]);
    let app = service!(state);

    for _ in 0..2 {
        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::post().uri("/start").to_request()).await;
        assert_eq!(body["accepted"], true);
        assert_eq!(body["status"], "started");
    }

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/status").to_request()).await;
    assert_eq!(body["status"], "Running");
    assert_eq!(body["ping_count"], 1);
    assert_eq!(body["targets"][0]["last_status"], "200");
    assert_eq!(body["targets"][0]["last_duration_ms"], 12);
    assert_ne!(body["last_ping"], "-");

    state.scheduler.stop().await;
}

#[actix_web::test]
async fn test_stop_is_always_acknowledged() {
    let (state, _dir) = app_state(&[UP]);
    let app = service!(state);

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::post().uri("/stop").to_request()).await;
    assert_eq!(body["accepted"], true);
    assert_eq!(body["status"], "stopped");

    test::call_service(&app, test::TestRequest::post().uri("/start").to_request()).await;
    test::call_service(&app, test::TestRequest::post().uri("/stop").to_request()).await;

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/status").to_request()).await;
    assert_eq!(body["running"], false);
    assert_eq!(body["uptime"], "00:00:00");
    assert_eq!(body["ping_count"], 1);
}

#[actix_web::test]
async fn test_failed_target_shows_error_without_failing_status() {
    let (state, _dir) = app_state(&[UP, DOWN]);
    let app = service!(state);

    test::call_service(&app, test::TestRequest::post().uri("/start").to_request()).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/status").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["ping_count"], 2);
    assert_eq!(body["targets"][0]["last_status"], "200");
    assert_eq!(body["targets"][1]["url"], DOWN);
    assert_eq!(body["targets"][1]["last_status"], "Error");
    assert_eq!(body["targets"][1]["status"]["state"], "error");
    assert_eq!(body["targets"][1]["ping_count"], 1);

    state.scheduler.stop().await;
}

#[actix_web::test]
async fn test_download_returns_csv_attachment() {
    let (state, _dir) = app_state(&[UP, DOWN]);
    let app = service!(state);

    test::call_service(&app, test::TestRequest::post().uri("/start").to_request()).await;
    state.scheduler.stop().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/download").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/csv");
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("ping_logs.csv"));

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "URL,Ping Count,Date,Time,Status Code,Duration (ms)");
    assert!(lines.iter().any(|l| l.starts_with(DOWN) && l.ends_with(",Error,0")));
}

#[actix_web::test]
async fn test_download_before_any_ping_is_header_only() {
    let (state, _dir) = app_state(&[UP]);
    let app = service!(state);

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/download").to_request()).await;
    assert_eq!(body, "Ping Count,Date,Time,Status Code,Duration (ms)\n");
}

#[actix_web::test]
async fn test_unreadable_log_is_a_server_error() {
    let dir = tempdir().unwrap();
    // a directory cannot be read as the log file
    let state = app_state_with_log(&[UP], dir.path().to_path_buf());
    let app = service!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/download").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
}
