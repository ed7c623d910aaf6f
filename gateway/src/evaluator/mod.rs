use std::time::Instant;

use assistant_core::types::{ChatRequest, ChatResponse};
use assistant_llm::completions::ChatCompletionsClient;
use serde::Serialize;
use thiserror::Error;

use crate::cli::EvaluateArgs;
use crate::config::Config;
use crate::CliError;

pub mod judge;
pub mod report;

use judge::{Grade, Grader, JudgeGrader};

#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("Input dataset not found: {0}")]
    DatasetNotFound(String),
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    AssistantError(#[from] assistant_llm::AssistantError),
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
    #[error("Chat endpoint returned {status}: {body}")]
    ChatFailed { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Graded,
    Failed,
}

/// One line of the output report.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub question: String,
    pub answer: String,
    pub grade: i64,
    pub rationale: String,
    pub status: RowStatus,
    pub latency_ms: u64,
}

/// The chat surface the evaluator drives; the production impl posts to a
/// running gateway over HTTP.
#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, EvaluatorError>;
}

pub struct HttpChatApi {
    client: reqwest::Client,
    url: String,
}

impl HttpChatApi {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl ChatApi for HttpChatApi {
    async fn ask(&self, question: &str) -> Result<String, EvaluatorError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest::new(question))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::ChatFailed { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.reply)
    }
}

async fn run_row(
    chat: &dyn ChatApi,
    grader: &dyn Grader,
    question: &str,
) -> Result<(String, Grade), EvaluatorError> {
    let answer = chat.ask(question).await?;
    let grade = grader.grade(question, &answer).await?;
    Ok((answer, grade))
}

/// Drive every dataset row through chat + grading, strictly one row at a
/// time. A failing row is recorded as `failed` and never aborts the batch.
pub async fn evaluate_rows(
    chat: &dyn ChatApi,
    grader: &dyn Grader,
    questions: &[String],
) -> Vec<EvaluationRecord> {
    let mut records = Vec::with_capacity(questions.len());

    for (idx, question) in questions.iter().enumerate() {
        let started = Instant::now();
        let record = match run_row(chat, grader, question).await {
            Ok((answer, grade)) => EvaluationRecord {
                question: question.clone(),
                answer,
                grade: grade.score,
                rationale: grade.reasoning,
                status: RowStatus::Graded,
                latency_ms: started.elapsed().as_millis() as u64,
            },
            Err(e) => {
                tracing::warn!(row = idx + 1, error = %e, "evaluation row failed");
                EvaluationRecord {
                    question: question.clone(),
                    answer: String::new(),
                    grade: 0,
                    rationale: e.to_string(),
                    status: RowStatus::Failed,
                    latency_ms: started.elapsed().as_millis() as u64,
                }
            }
        };
        tracing::info!(
            row = idx + 1,
            total = questions.len(),
            grade = record.grade,
            status = ?record.status,
            "evaluated row"
        );
        records.push(record);
    }

    records
}

pub async fn run_evaluation(config: &Config, args: EvaluateArgs) -> Result<(), CliError> {
    let questions = report::read_questions(&args.input)?;
    tracing::info!(rows = questions.len(), input = %args.input, "starting evaluation run");

    let chat = HttpChatApi::new(config.evaluator.chat_url.clone());
    let judge = JudgeGrader::new(
        ChatCompletionsClient::from_env()?,
        config.evaluator.judge_model.clone(),
    );

    let records = evaluate_rows(&chat, &judge, &questions).await;
    report::write_report(&args.output, &records)?;

    let graded: Vec<_> = records
        .iter()
        .filter(|r| r.status == RowStatus::Graded)
        .collect();
    let average = if graded.is_empty() {
        0.0
    } else {
        graded.iter().map(|r| r.grade as f64).sum::<f64>() / graded.len() as f64
    };
    tracing::info!(
        total = records.len(),
        graded = graded.len(),
        failed = records.len() - graded.len(),
        average_grade = average,
        output = %args.output,
        "evaluation run finished"
    );

    Ok(())
}
