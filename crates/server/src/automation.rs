//! Sequential automation runner.
//!
//! Steps invoke the same implementations the HTTP handlers use, in-process.
//! A bad step produces an error entry in the results; it never aborts the
//! batch and never panics.

use paintd_core::{price_quote, AutomationStep, QuoteRequest, StepOutcome};
use paintd_enrich::Enricher;
use paintd_outbound::{QueuedTask, TaskQueue};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueStepParams {
    #[serde(default)]
    task_name: String,
    payload: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct EnrichStepParams {
    #[serde(default)]
    prompt: String,
    context: Option<Value>,
}

/// Runs steps strictly in order, one result entry per input step.
pub async fn run_steps(
    enricher: &Enricher,
    queue: &dyn TaskQueue,
    steps: Vec<AutomationStep>,
) -> Vec<StepOutcome> {
    let mut results = Vec::with_capacity(steps.len());
    for step in steps {
        let outcome = run_step(enricher, queue, step).await;
        results.push(outcome);
    }
    results
}

async fn run_step(enricher: &Enricher, queue: &dyn TaskQueue, step: AutomationStep) -> StepOutcome {
    let step_type = step.step_type.clone();
    match step_type.as_str() {
        "price" => match serde_json::from_value::<QuoteRequest>(step.params) {
            Ok(request) => {
                let quote = price_quote(&request);
                match serde_json::to_value(&quote) {
                    Ok(value) => StepOutcome::succeeded(&step_type, value),
                    Err(error) => StepOutcome::failed(&step_type, error.to_string()),
                }
            }
            Err(_) => StepOutcome::failed(&step_type, "Invalid input"),
        },
        "queue" => match serde_json::from_value::<QueueStepParams>(step.params) {
            Ok(params) if !params.task_name.trim().is_empty() => {
                let task = QueuedTask::new(params.task_name, params.payload);
                if let Err(error) = queue.send(&task).await {
                    warn!(
                        event_name = "server.automation.queue_failed",
                        task_name = %task.task_name,
                        error = %error,
                        "queue forward failed, reporting queued anyway"
                    );
                }
                StepOutcome::succeeded(&step_type, json!({ "queued": true }))
            }
            Ok(_) | Err(_) => StepOutcome::failed(&step_type, "taskName is required"),
        },
        "enrich" => match serde_json::from_value::<EnrichStepParams>(step.params) {
            Ok(params) if !params.prompt.trim().is_empty() => {
                let context = params.context.unwrap_or_else(|| json!({}));
                let message = enricher.enrich(&params.prompt, &context).await;
                StepOutcome::succeeded(&step_type, json!({ "message": message }))
            }
            Ok(_) | Err(_) => StepOutcome::failed(&step_type, "prompt is required"),
        },
        other => {
            info!(
                event_name = "server.automation.unknown_step",
                step_type = %other,
                "skipping unknown automation step"
            );
            StepOutcome::failed(other, format!("Unknown step type: {other}"))
        }
    }
}
