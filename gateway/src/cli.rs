use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    #[command(flatten)]
    pub serve_args: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Parser, Default)]
pub struct ServeArgs {
    /// Host address to bind to (e.g., 127.0.0.1 for local or 0.0.0.0 for all interfaces)
    #[arg(long, value_name = "ADDRESS")]
    pub host: Option<String>,

    /// Port to listen on (e.g., 5000)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Comma-separated list of allowed CORS origins (e.g., http://localhost:3000,https://example.com)
    #[arg(long, value_name = "ORIGINS")]
    pub cors_origins: Option<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct EvaluateArgs {
    /// CSV file with one question per row (a `question` header row is optional)
    #[arg(short, long, default_value = "test_questions.csv")]
    pub input: String,

    /// Output CSV report path
    #[arg(short, long, default_value = "evaluation_report.csv")]
    pub output: String,

    /// Chat endpoint to drive (defaults to the configured gateway URL)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Judge model override
    #[arg(long, value_name = "MODEL")]
    pub judge_model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server (default if no command specified)
    Serve(ServeArgs),
    /// Run the CSV question dataset against a live gateway and write a graded report
    Evaluate(EvaluateArgs),
}
