use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use assistant_core::assistant::AssistantSettings;
use assistant_core::prompt::ProductCatalog;
use assistant_core::validation::DEFAULT_MAX_MESSAGE_LEN;
use assistant_guardrails::types::GuardrailSettings;
use assistant_llm::poll::PollSettings;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config file. Error: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("Failed to read template in config. Error: {0}")]
    ReadError(#[from] minijinja::Error),
    #[error("{0} is not set")]
    MissingEnv(&'static str),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssistantConfig {
    /// Provider credential; usually supplied via OPENAI_API_KEY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Which hosted assistant to call; usually supplied via ASSISTANT_ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(default = "default_temperature_knowledge")]
    pub temperature_knowledge: f32,
    #[serde(default = "default_temperature_code")]
    pub temperature_code: f32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

fn default_temperature_knowledge() -> f32 {
    0.2
}

fn default_temperature_code() -> f32 {
    0.4
}

fn default_poll_interval_ms() -> u64 {
    800
}

fn default_poll_timeout_secs() -> u64 {
    60
}

fn default_max_message_len() -> usize {
    DEFAULT_MAX_MESSAGE_LEN
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_id: None,
            temperature_knowledge: default_temperature_knowledge(),
            temperature_code: default_temperature_code(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_secs: default_poll_timeout_secs(),
            max_message_len: default_max_message_len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EvaluatorConfig {
    #[serde(default = "default_judge_model")]
    pub judge_model: String,
    #[serde(default = "default_chat_url")]
    pub chat_url: String,
}

fn default_judge_model() -> String {
    "gpt-4o".to_string()
}

fn default_chat_url() -> String {
    "http://127.0.0.1:5000/chat".to_string()
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            judge_model: default_judge_model(),
            chat_url: default_chat_url(),
        }
    }
}

/// Immutable runtime configuration, built once at startup from the YAML
/// file, environment overrides and CLI flags, then threaded into each
/// component.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub guardrails: GuardrailSettings,
    #[serde(default)]
    pub products: ProductCatalog,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

fn replace_env_vars(content: String) -> Result<String, ConfigError> {
    let env = Environment::new();
    let template = env.template_from_str(&content)?;
    let parameters = template.undeclared_variables(false);

    let mut variables = HashMap::new();
    parameters.iter().for_each(|k| {
        if let Ok(v) = std::env::var(k) {
            variables.insert(k, v);
        };
    });

    Ok(template.render(variables)?)
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| v == "1")
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(config_path) {
            Ok(content) => {
                let content = replace_env_vars(content)?;
                Ok(serde_yaml::from_str(&content)?)
            }
            Err(_e) => Ok(Self::default()),
        }
    }

    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            self.assistant.api_key = Some(api_key);
        }
        if let Ok(assistant_id) = std::env::var("ASSISTANT_ID") {
            self.assistant.assistant_id = Some(assistant_id);
        }
        if let Some(enabled) = env_flag("ENABLE_PRODUCT_SCOPE_GUARDRAIL") {
            self.guardrails.scope_enabled = enabled;
        }
        if let Some(enabled) = env_flag("ENABLE_FORMAT_GUARDRAIL") {
            self.guardrails.format_enabled = enabled;
        }
        if let Some(interval) = std::env::var("RUN_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.assistant.poll_interval_ms = interval;
        }
        if let Some(timeout) = std::env::var("RUN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.assistant.poll_timeout_secs = timeout;
        }
        self
    }

    pub fn apply_cli_overrides(mut self, cli: &cli::Cli) -> Self {
        let mut serve_args = cli.serve_args.clone();
        if let Some(cli::Commands::Serve(args)) = &cli.command {
            serve_args = args.clone();
        }

        if let Some(host) = &serve_args.host {
            self.http.host = host.clone();
        }
        if let Some(port) = serve_args.port {
            self.http.port = port;
        }
        if let Some(cors) = &serve_args.cors_origins {
            self.http.cors_allowed_origins =
                cors.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Some(cli::Commands::Evaluate(args)) = &cli.command {
            if let Some(url) = &args.url {
                self.evaluator.chat_url = url.clone();
            }
            if let Some(model) = &args.judge_model {
                self.evaluator.judge_model = model.clone();
            }
        }
        self
    }

    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.assistant
            .api_key
            .clone()
            .ok_or(ConfigError::MissingEnv("OPENAI_API_KEY"))
    }

    pub fn assistant_settings(&self) -> Result<AssistantSettings, ConfigError> {
        let assistant_id = self
            .assistant
            .assistant_id
            .clone()
            .ok_or(ConfigError::MissingEnv("ASSISTANT_ID"))?;

        Ok(AssistantSettings {
            assistant_id,
            temperature_knowledge: self.assistant.temperature_knowledge,
            temperature_code: self.assistant.temperature_code,
            poll: PollSettings {
                interval: Duration::from_millis(self.assistant.poll_interval_ms),
                budget: Duration::from_secs(self.assistant.poll_timeout_secs),
            },
        })
    }
}
