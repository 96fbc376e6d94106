use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

/// Download the full ping log as CSV
#[get("/download")]
pub async fn download_route(data: web::Data<AppState>) -> impl Responder {
    match data.scheduler.log().export().await {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(data.download_name.clone())],
            })
            .body(bytes),
        Err(e) => {
            error!("Failed to export ping log: {e}");
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}
