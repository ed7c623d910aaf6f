use std::sync::Arc;

use actix_web::{web, HttpResponse};
use assistant_core::assistant::AssistantService;
use assistant_core::types::{ChatRequest, ChatResponse};
use assistant_core::validation::validate_chat_request;
use assistant_core::GatewayApiError;
use assistant_guardrails::GuardrailPipeline;

use crate::config::Config;

/// POST /chat - validate, drive the assistant, post-process the reply.
pub async fn chat(
    config: web::Data<Config>,
    service: web::Data<Arc<AssistantService>>,
    pipeline: web::Data<Arc<GuardrailPipeline>>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, GatewayApiError> {
    let request = validate_chat_request(body.into_inner(), config.assistant.max_message_len)?;

    let raw = service.respond(&request).await?;
    let verdict = pipeline.apply(&request.message, &raw.reply);

    if verdict.scope_flag {
        tracing::info!(session_id = %raw.session_id, "reply flagged out of product scope");
    }

    Ok(HttpResponse::Ok().json(ChatResponse {
        reply: verdict.reply,
        session_id: raw.session_id,
        scope_flag: verdict.scope_flag,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use assistant_core::assistant::AssistantSettings;
    use assistant_core::prompt::ProductCatalog;
    use assistant_core::session::InMemorySessionStore;
    use assistant_llm::error::AssistantResult;
    use assistant_llm::poll::PollSettings;
    use assistant_llm::provider::{AssistantProvider, RunParams};
    use assistant_llm::types::{MessageObject, RunObject, RunStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Always completes immediately with a fixed reply; counts provider
    /// calls so tests can assert the adapter was never reached.
    struct CountingProvider {
        reply: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl AssistantProvider for CountingProvider {
        async fn create_thread(&self) -> AssistantResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("thread_1".to_string())
        }

        async fn add_user_message(
            &self,
            _thread_id: &str,
            _content: &str,
        ) -> AssistantResult<MessageObject> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MessageObject {
                id: "msg_1".to_string(),
                role: "user".to_string(),
                content: vec![],
            })
        }

        async fn create_run(
            &self,
            _thread_id: &str,
            _params: &RunParams,
        ) -> AssistantResult<RunObject> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RunObject {
                id: "run_1".to_string(),
                thread_id: "thread_1".to_string(),
                status: RunStatus::Completed,
                last_error: None,
            })
        }

        async fn retrieve_run(&self, _thread_id: &str, _run_id: &str) -> AssistantResult<RunObject> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RunObject {
                id: "run_1".to_string(),
                thread_id: "thread_1".to_string(),
                status: RunStatus::Completed,
                last_error: None,
            })
        }

        async fn latest_assistant_message(
            &self,
            _thread_id: &str,
        ) -> AssistantResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.reply.clone()))
        }
    }

    fn test_state(reply: &str) -> (web::Data<Config>, web::Data<Arc<AssistantService>>, web::Data<Arc<GuardrailPipeline>>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Arc::new(CountingProvider {
            reply: reply.to_string(),
            calls: calls.clone(),
        });

        let mut settings = AssistantSettings::new("asst_test");
        settings.poll = PollSettings {
            interval: Duration::from_millis(1),
            budget: Duration::from_millis(20),
        };

        let service = Arc::new(AssistantService::new(
            provider,
            Arc::new(InMemorySessionStore::new()),
            ProductCatalog::default(),
            settings,
        ));
        let pipeline = Arc::new(GuardrailPipeline::new(
            Default::default(),
            ProductCatalog::default(),
        ));

        (
            web::Data::new(Config::default()),
            web::Data::new(service),
            web::Data::new(pipeline),
            calls,
        )
    }

    #[actix_web::test]
    async fn empty_message_is_rejected_before_any_provider_call() {
        let (config, service, pipeline, calls) = test_state("unused");
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(service)
                .app_data(pipeline)
                .route("/chat", web::post().to(chat)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "   " }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn on_topic_chat_round_trips_with_session_id() {
        let (config, service, pipeline, _calls) =
            test_state("## Answer\nOpen the MetaDefender console.");
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(service)
                .app_data(pipeline)
                .route("/chat", web::post().to(chat)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "How do I configure MetaDefender?" }))
            .to_request();
        let body: ChatResponse = test::call_and_read_body_json(&app, request).await;

        assert!(!body.scope_flag);
        assert_eq!(body.reply, "## Answer\nOpen the MetaDefender console.");
        assert!(!body.session_id.is_empty());

        // Replaying the minted session id is accepted.
        let request = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({
                "message": "And how do I update MetaDefender?",
                "session_id": body.session_id,
            }))
            .to_request();
        let follow_up: ChatResponse = test::call_and_read_body_json(&app, request).await;
        assert_eq!(follow_up.session_id, body.session_id);
    }

    #[actix_web::test]
    async fn off_topic_reply_is_refused_and_flagged() {
        let (config, service, pipeline, _calls) = test_state("It is sunny with a light breeze.");
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(service)
                .app_data(pipeline)
                .route("/chat", web::post().to(chat)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({ "message": "What's the weather today?" }))
            .to_request();
        let body: ChatResponse = test::call_and_read_body_json(&app, request).await;

        assert!(body.scope_flag);
        assert_eq!(
            body.reply,
            assistant_guardrails::types::DEFAULT_REFUSAL_MESSAGE
        );
    }

    #[actix_web::test]
    async fn unknown_session_id_maps_to_not_found() {
        let (config, service, pipeline, calls) = test_state("unused");
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(service)
                .app_data(pipeline)
                .route("/chat", web::post().to(chat)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({
                "message": "hello",
                "session_id": "stale-session",
            }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
