use std::sync::Arc;

use actix_web::{web, HttpResponse};
use assistant_core::assistant::AssistantService;
use assistant_core::types::{SessionDeleteRequest, SessionDeleteResponse};
use assistant_core::GatewayApiError;

/// POST /session/delete - drop the server-side session mapping. Does not
/// delete any provider-side conversation data.
pub async fn delete_session(
    service: web::Data<Arc<AssistantService>>,
    body: web::Json<SessionDeleteRequest>,
) -> Result<HttpResponse, GatewayApiError> {
    let session_id = &body.session_id;

    if service.delete_session(session_id).await {
        Ok(HttpResponse::Ok().json(SessionDeleteResponse {
            deleted: true,
            message: format!("Session {session_id} deleted successfully."),
        }))
    } else {
        Ok(HttpResponse::NotFound().json(SessionDeleteResponse {
            deleted: false,
            message: format!("Session {session_id} not found."),
        }))
    }
}
