use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::error::{AssistantError, AssistantResult};
use crate::provider::{AssistantProvider, RunParams};
use crate::types::{
    CreateMessageRequest, CreateRunRequest, ListResponse, MessageObject, RunObject, ThreadObject,
};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

fn api_base() -> String {
    std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

/// Client for the hosted Assistants API (threads, messages, runs).
pub struct OpenAiAssistantClient {
    client: reqwest::Client,
    api_base: String,
}

impl OpenAiAssistantClient {
    pub fn new(api_key: &str) -> AssistantResult<Self> {
        let mut headers = HeaderMap::new();
        let authorization_value = format!("Bearer {api_key}");
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization_value)
                .map_err(|_| AssistantError::InvalidApiKey)?,
        );
        // Threads/runs endpoints require the beta opt-in header.
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base(),
        })
    }

    pub fn from_env() -> AssistantResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| AssistantError::MissingApiKey)?;
        Self::new(&api_key)
    }

    async fn check(response: reqwest::Response) -> AssistantResult<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::ApiError { status, body });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl AssistantProvider for OpenAiAssistantClient {
    async fn create_thread(&self) -> AssistantResult<String> {
        let url = format!("{}/threads", self.api_base);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let thread: ThreadObject = Self::check(response).await?.json().await?;
        tracing::debug!(thread_id = %thread.id, "created provider thread");
        Ok(thread.id)
    }

    async fn add_user_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> AssistantResult<MessageObject> {
        let url = format!("{}/threads/{}/messages", self.api_base, thread_id);
        let body = CreateMessageRequest {
            role: "user",
            content,
        };
        let response = self.client.post(&url).json(&body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_run(&self, thread_id: &str, params: &RunParams) -> AssistantResult<RunObject> {
        let url = format!("{}/threads/{}/runs", self.api_base, thread_id);
        let body = CreateRunRequest {
            assistant_id: &params.assistant_id,
            instructions: params.instructions.as_deref(),
            temperature: params.temperature,
        };
        let response = self.client.post(&url).json(&body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> AssistantResult<RunObject> {
        let url = format!("{}/threads/{}/runs/{}", self.api_base, thread_id, run_id);
        let response = self.client.get(&url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn latest_assistant_message(&self, thread_id: &str) -> AssistantResult<Option<String>> {
        let url = format!(
            "{}/threads/{}/messages?order=desc&limit=20",
            self.api_base, thread_id
        );
        let response = self.client.get(&url).send().await?;
        let messages: ListResponse<MessageObject> = Self::check(response).await?.json().await?;

        Ok(messages
            .data
            .iter()
            .find(|m| m.role == "assistant")
            .and_then(|m| m.text())
            .map(str::to_string))
    }
}
