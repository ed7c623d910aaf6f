use crate::error::AssistantResult;
use crate::types::{MessageObject, RunObject};

pub mod openai;

pub use openai::OpenAiAssistantClient;

/// Parameters for starting an assistant run on an existing thread.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub assistant_id: String,
    pub instructions: Option<String>,
    pub temperature: Option<f32>,
}

/// The provider capabilities the gateway relies on: conversation threads,
/// message submission, run polling and reply retrieval.
#[async_trait::async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Create a fresh provider-side conversation thread and return its id.
    async fn create_thread(&self) -> AssistantResult<String>;

    /// Append a user message to a thread.
    async fn add_user_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> AssistantResult<MessageObject>;

    /// Start an assistant run against a thread.
    async fn create_run(&self, thread_id: &str, params: &RunParams) -> AssistantResult<RunObject>;

    /// Re-fetch a run to observe its current status.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> AssistantResult<RunObject>;

    /// Newest assistant-authored message text on a thread, if any.
    async fn latest_assistant_message(&self, thread_id: &str) -> AssistantResult<Option<String>>;
}
