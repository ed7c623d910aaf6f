use std::time::Duration;

use thiserror::Error;

use crate::types::RunStatus;

pub type AssistantResult<T> = Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    ParseError(#[from] serde_json::Error),

    #[error("Provider returned {status}: {body}")]
    ApiError {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Assistant run {run_id} ended as {status:?}: {message}")]
    RunFailed {
        run_id: String,
        status: RunStatus,
        message: String,
    },

    #[error("Assistant run did not reach a terminal state within {0:?}")]
    RunTimedOut(Duration),

    #[error("Assistant completed the run but returned no text")]
    EmptyReply,

    #[error("Custom Error: {0}")]
    CustomError(String),
}
