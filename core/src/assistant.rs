use std::sync::Arc;

use assistant_llm::error::AssistantError;
use assistant_llm::poll::{wait_for_run, PollSettings, RunOutcome};
use assistant_llm::provider::{AssistantProvider, RunParams};

use crate::error::GatewayApiError;
use crate::prompt::{self, Intent, ProductCatalog, SYSTEM_INSTRUCTION};
use crate::session::{self, SessionStore};
use crate::types::ChatRequest;
use crate::GatewayResult;

/// Run-level tuning for the hosted assistant.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub assistant_id: String,
    pub temperature_knowledge: f32,
    pub temperature_code: f32,
    pub poll: PollSettings,
}

impl AssistantSettings {
    pub fn new(assistant_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            temperature_knowledge: 0.2,
            temperature_code: 0.4,
            poll: PollSettings::default(),
        }
    }
}

/// Raw (pre-guardrail) assistant reply plus the session it belongs to.
#[derive(Debug, Clone)]
pub struct AssistantReply {
    pub reply: String,
    pub session_id: String,
}

/// Maps validated chat requests onto provider conversations: session
/// lookup/create, message submission, bounded run polling, reply retrieval.
pub struct AssistantService {
    provider: Arc<dyn AssistantProvider>,
    sessions: Arc<dyn SessionStore>,
    catalog: ProductCatalog,
    settings: AssistantSettings,
}

impl AssistantService {
    pub fn new(
        provider: Arc<dyn AssistantProvider>,
        sessions: Arc<dyn SessionStore>,
        catalog: ProductCatalog,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            provider,
            sessions,
            catalog,
            settings,
        }
    }

    /// Resolve the provider thread for this request, creating a fresh
    /// session when the caller has none. Unknown ids fail before any
    /// provider call is made.
    async fn resolve_session(&self, request: &ChatRequest) -> GatewayResult<(String, String)> {
        match request.session_id.as_deref() {
            Some(session_id) => {
                let thread_id = self
                    .sessions
                    .resolve(session_id)
                    .await
                    .ok_or_else(|| GatewayApiError::SessionNotFound(session_id.to_string()))?;
                Ok((session_id.to_string(), thread_id))
            }
            None => {
                let thread_id = self.provider.create_thread().await?;
                let session_id = session::mint_session_id();
                tracing::info!(%session_id, %thread_id, "created new session");
                self.sessions
                    .insert(session_id.clone(), thread_id.clone())
                    .await;
                Ok((session_id, thread_id))
            }
        }
    }

    pub async fn respond(&self, request: &ChatRequest) -> GatewayResult<AssistantReply> {
        let (session_id, thread_id) = self.resolve_session(request).await?;

        let intent = prompt::categorize_intent(&request.message, request.language.as_deref());
        let temperature = if intent == Intent::Code {
            self.settings.temperature_code
        } else {
            self.settings.temperature_knowledge
        };

        let wrapped = prompt::build_wrapped_user_message(request, &self.catalog);
        self.provider.add_user_message(&thread_id, &wrapped).await?;

        let params = RunParams {
            assistant_id: self.settings.assistant_id.clone(),
            instructions: Some(SYSTEM_INSTRUCTION.to_string()),
            temperature: Some(temperature),
        };
        let run = self.provider.create_run(&thread_id, &params).await?;

        match wait_for_run(self.provider.as_ref(), &thread_id, run, &self.settings.poll).await? {
            RunOutcome::Completed(_) => {
                let reply = self
                    .provider
                    .latest_assistant_message(&thread_id)
                    .await?
                    .ok_or(AssistantError::EmptyReply)?;
                Ok(AssistantReply { reply, session_id })
            }
            RunOutcome::Failed {
                run_id,
                status,
                code,
                message,
            } => {
                let message = match code {
                    Some(code) => format!("{code}: {message}"),
                    None => message,
                };
                Err(AssistantError::RunFailed {
                    run_id,
                    status,
                    message,
                }
                .into())
            }
            RunOutcome::TimedOut { waited, .. } => Err(AssistantError::RunTimedOut(waited).into()),
        }
    }

    /// Drop the local session mapping; provider-side history stays intact.
    pub async fn delete_session(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).await
    }
}
