//! Automation batch types.
//!
//! A batch is an ordered list of steps; each step re-uses one of the
//! dispatcher operations (price, queue, enrich). Steps carry no shared state
//! and results preserve input order, one entry per step.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn empty_params() -> Value {
    Value::Object(serde_json::Map::new())
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AutomationStep {
    #[serde(rename = "type", default)]
    pub step_type: String,
    #[serde(default = "empty_params")]
    pub params: Value,
}

/// Outcome of one step: `{type, result}` on success, `{type, error}` when the
/// step could not run. A failed step never aborts the batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepOutcome {
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn succeeded(step_type: impl Into<String>, result: Value) -> Self {
        Self { step_type: step_type.into(), result: Some(result), error: None }
    }

    pub fn failed(step_type: impl Into<String>, error: impl Into<String>) -> Self {
        Self { step_type: step_type.into(), result: None, error: Some(error.into()) }
    }
}
