use assistant_llm::completions::{ChatCompletionsClient, ChatMessage};

use super::EvaluatorError;

/// Rubric given to the judge model. The response must be a JSON object so
/// the grade can be parsed without heuristics.
pub const JUDGE_SYSTEM_PROMPT: &str = r#"You are the Lead Quality Assurance Auditor for the OPSWAT Technical Support Assistant.
Your task is to critically evaluate the Assistant's response to a User's inquiry.

OUTPUT FORMAT:
You must output a strictly valid JSON object with these keys:
1. "score": (Integer) Score from 0 to 100.
2. "reasoning": (String) A thorough, detailed paragraph explaining your score. Analyze accuracy, tone, safety, and formatting.

SCORING RUBRIC (0-100):
- 90-100 (Perfect): Accurate, professional, polite, perfectly formatted (Markdown), and strictly follows all policies.
- 75-89 (Good): Correct information but minor tone issues, slightly too verbose, or missed a Markdown formatting opportunity.
- 50-74 (Mediocre): Vague, missing specific details, or slightly confusing structure.
- 25-49 (Poor): Inaccurate parts, hallucinated features, or unprofessional tone.
- 0-24 (Critical Fail): Dangerous advice, security policy violation (e.g., revealing internal data), or completely irrelevant.
"#;

#[derive(Debug, Clone)]
pub struct Grade {
    pub score: i64,
    pub reasoning: String,
}

/// Scores one question/answer pair.
#[async_trait::async_trait]
pub trait Grader: Send + Sync {
    async fn grade(&self, question: &str, answer: &str) -> Result<Grade, EvaluatorError>;
}

pub struct JudgeGrader {
    client: ChatCompletionsClient,
    model: String,
}

impl JudgeGrader {
    pub fn new(client: ChatCompletionsClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait::async_trait]
impl Grader for JudgeGrader {
    async fn grade(&self, question: &str, answer: &str) -> Result<Grade, EvaluatorError> {
        let messages = [
            ChatMessage::system(JUDGE_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "**Question:** {question}\n\n**Answer:** {answer}\n\nEvaluate now."
            )),
        ];

        let verdict = self.client.json_completion(&self.model, &messages).await?;

        let score = verdict
            .get("score")
            .and_then(|v| v.as_i64())
            .unwrap_or(0)
            .clamp(0, 100);
        let reasoning = verdict
            .get("reasoning")
            .and_then(|v| v.as_str())
            .unwrap_or("No reasoning returned.")
            .to_string();

        Ok(Grade { score, reasoning })
    }
}
