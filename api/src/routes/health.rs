use actix_web::HttpResponse;
use chrono::Utc;

use crate::app::uptime_seconds;
use crate::dto::HealthResponse;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        service: "lap-verify".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds: uptime_seconds(),
    })
}
