use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use assistant_core::assistant::AssistantService;
use assistant_core::session::InMemorySessionStore;
use assistant_guardrails::GuardrailPipeline;
use assistant_llm::provider::{AssistantProvider, OpenAiAssistantClient};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::handlers;
use crate::handlers::health::HealthInfo;

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum CorsOptions {
    Permissive,
    Custom(Vec<String>),
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Actix(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Assistant(#[from] assistant_llm::AssistantError),
}

#[derive(Clone, Debug)]
pub struct ApiServer {
    config: Config,
}

impl ApiServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn get_cors(options: CorsOptions) -> Cors {
        match options {
            CorsOptions::Permissive => Cors::permissive(),
            CorsOptions::Custom(origins) => origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
        }
    }

    pub async fn start(self) -> Result<(), ServerError> {
        let api_key = self.config.api_key()?;
        let settings = self.config.assistant_settings()?;

        let provider: Arc<dyn AssistantProvider> = Arc::new(OpenAiAssistantClient::new(&api_key)?);
        let sessions = Arc::new(InMemorySessionStore::new());
        let service = Arc::new(AssistantService::new(
            provider,
            sessions,
            self.config.products.clone(),
            settings.clone(),
        ));
        let pipeline = Arc::new(GuardrailPipeline::new(
            self.config.guardrails.clone(),
            self.config.products.clone(),
        ));
        let health = HealthInfo::new("assistant-gateway", settings.assistant_id.clone());

        let host = self.config.http.host.clone();
        let port = self.config.http.port;
        tracing::info!(%host, port, "HTTP server starting");

        let config = self.config.clone();
        HttpServer::new(move || {
            let cors_options = if config.http.cors_allowed_origins.iter().any(|o| o == "*") {
                CorsOptions::Permissive
            } else {
                CorsOptions::Custom(config.http.cors_allowed_origins.clone())
            };

            App::new()
                .wrap(Self::get_cors(cors_options))
                .app_data(web::Data::new(config.clone()))
                .app_data(web::Data::new(service.clone()))
                .app_data(web::Data::new(pipeline.clone()))
                .app_data(web::Data::new(health.clone()))
                .route("/health", web::get().to(handlers::health::health_check))
                .route("/chat", web::post().to(handlers::chat::chat))
                .route(
                    "/session/delete",
                    web::post().to(handlers::session::delete_session),
                )
        })
        .bind((host.as_str(), port))?
        .run()
        .await
        .map_err(ServerError::Actix)
    }
}
