use std::time::Duration;

use tokio::time::Instant;

use crate::error::AssistantResult;
use crate::provider::AssistantProvider;
use crate::types::{RunObject, RunStatus};

/// Poll cadence and wait budget for a single assistant run.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub budget: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(800),
            budget: Duration::from_secs(60),
        }
    }
}

/// How a polled run ended. Callers pattern-match instead of catching errors;
/// transport failures still surface as `Err`.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunObject),
    Failed {
        run_id: String,
        status: RunStatus,
        code: Option<String>,
        message: String,
    },
    TimedOut {
        run_id: String,
        waited: Duration,
    },
}

fn settle(run: RunObject) -> RunOutcome {
    if run.status == RunStatus::Completed {
        return RunOutcome::Completed(run);
    }

    let (code, message) = match &run.last_error {
        Some(err) => (Some(err.code.clone()), err.message.clone()),
        None => (None, format!("{:?}", run.status)),
    };
    RunOutcome::Failed {
        run_id: run.id,
        status: run.status,
        code,
        message,
    }
}

/// Re-check a run at `settings.interval` until it reaches a terminal state
/// or the wait budget is spent. The run passed in may already be terminal.
pub async fn wait_for_run(
    provider: &dyn AssistantProvider,
    thread_id: &str,
    run: RunObject,
    settings: &PollSettings,
) -> AssistantResult<RunOutcome> {
    let started = Instant::now();
    let mut run = run;

    loop {
        if run.status.is_terminal() {
            return Ok(settle(run));
        }

        let waited = started.elapsed();
        if waited >= settings.budget {
            tracing::warn!(run_id = %run.id, ?waited, "assistant run exceeded poll budget");
            return Ok(RunOutcome::TimedOut {
                run_id: run.id,
                waited,
            });
        }

        tokio::time::sleep(settings.interval).await;
        run = provider.retrieve_run(thread_id, &run.id).await?;
    }
}
