use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use assistant_llm::error::AssistantError;
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum GatewayApiError {
    #[error("Failed to parse JSON")]
    JsonParseError(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unknown session id {0}; retry without a session_id to start a new conversation")]
    SessionNotFound(String),

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error("{0}")]
    CustomError(String),
}

impl actix_web::error::ResponseError for GatewayApiError {
    fn error_response(&self) -> HttpResponse {
        tracing::error!("API error: {:?}", self);

        let json_error = json!({
            "error": self.to_string(),
        });

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json_error)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GatewayApiError::JsonParseError(_) => StatusCode::BAD_REQUEST,
            GatewayApiError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            GatewayApiError::Assistant(e) => match e {
                AssistantError::RunTimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
                AssistantError::MissingApiKey | AssistantError::InvalidApiKey => {
                    StatusCode::UNAUTHORIZED
                }
                // reqwest and actix disagree on the http crate version, so
                // compare the provider status numerically.
                AssistantError::ApiError { status, .. } if status.as_u16() == 401 => {
                    StatusCode::UNAUTHORIZED
                }
                _ => StatusCode::BAD_GATEWAY,
            },
            GatewayApiError::CustomError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::ResponseError;
    use assistant_llm::types::RunStatus;
    use std::time::Duration;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        assert_eq!(
            GatewayApiError::Validation(ValidationError::EmptyMessage).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayApiError::SessionNotFound("stale".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayApiError::Assistant(AssistantError::RunTimedOut(Duration::from_secs(60)))
                .status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );

        let upstream = AssistantError::RunFailed {
            run_id: "run_1".to_string(),
            status: RunStatus::Failed,
            message: "server_error: boom".to_string(),
        };
        assert_eq!(
            GatewayApiError::Assistant(upstream).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
