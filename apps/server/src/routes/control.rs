use actix_web::{HttpResponse, Responder, post, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ControlResponse {
    accepted: bool,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Start monitoring. Repeated calls are acknowledged without re-pinging.
#[post("/start")]
pub async fn start_route(data: web::Data<AppState>) -> impl Responder {
    data.scheduler.start().await;

    HttpResponse::Ok().json(ControlResponse {
        accepted: true,
        status: "started",
        message: Some("Pinger started and first ping done immediately."),
    })
}

/// Stop monitoring. Stopping a stopped monitor is acknowledged as well.
#[post("/stop")]
pub async fn stop_route(data: web::Data<AppState>) -> impl Responder {
    data.scheduler.stop().await;

    HttpResponse::Ok().json(ControlResponse { accepted: true, status: "stopped", message: None })
}
