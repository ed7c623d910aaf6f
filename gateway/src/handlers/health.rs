use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthInfo {
    pub status: &'static str,
    pub service: &'static str,
    pub assistant_id: String,
}

impl HealthInfo {
    pub fn new(service: &'static str, assistant_id: String) -> Self {
        Self {
            status: "ok",
            service,
            assistant_id,
        }
    }
}

/// GET /health - liveness indicator, no side effects.
pub async fn health_check(info: web::Data<HealthInfo>) -> HttpResponse {
    HttpResponse::Ok().json(info.get_ref())
}
