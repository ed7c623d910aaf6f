use clap::Parser;
use thiserror::Error;

mod cli;
mod config;
mod evaluator;
mod handlers;
mod http;
mod logging;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    YamlError(#[from] serde_yaml::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    ServerError(#[from] http::ServerError),
    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),
    #[error(transparent)]
    AssistantError(#[from] assistant_llm::AssistantError),
    #[error(transparent)]
    EvaluatorError(#[from] evaluator::EvaluatorError),
    #[error("Error: {0}")]
    CustomError(String),
}

#[actix_web::main]
async fn main() -> Result<(), CliError> {
    dotenv::dotenv().ok();
    logging::init_tracing();

    let cli = cli::Cli::parse();
    let config = config::Config::load(&cli.config)?
        .apply_env_overrides()
        .apply_cli_overrides(&cli);

    match cli.command {
        Some(cli::Commands::Evaluate(args)) => {
            evaluator::run_evaluation(&config, args).await?;
            Ok(())
        }
        Some(cli::Commands::Serve(_)) | None => {
            let server = http::ApiServer::new(config);
            server.start().await?;
            Ok(())
        }
    }
}
