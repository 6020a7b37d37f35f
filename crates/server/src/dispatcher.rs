//! Dispatcher service: pricing, queue forwarding, enrichment, automation
//! batches, and operator contact notifications.
//!
//! POST-only exact matches under `/api/`; anything else, wrong methods
//! included, is a 404 with the shared error envelope.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use paintd_core::{price_quote, AutomationStep, QuoteRequest, QuoteResult, StepOutcome};
use paintd_enrich::Enricher;
use paintd_outbound::{Mailer, QueuedTask, TaskQueue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};

use crate::api::{self, bad_request, ApiFailure};
use crate::automation::run_steps;
use crate::health::{self, Capabilities, HealthState};
use crate::notify::{operator_notification, ContactDetails, EmailRoutes};

#[derive(Clone)]
pub struct DispatcherState {
    pub enricher: Arc<Enricher>,
    pub queue: Arc<dyn TaskQueue>,
    pub mailer: Arc<dyn Mailer>,
    pub email_routes: EmailRoutes,
    pub capabilities: Capabilities,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRequest {
    #[serde(default)]
    pub task_name: String,
    pub payload: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct QueueAccepted {
    pub queued: bool,
}

#[derive(Debug, Deserialize)]
pub struct EnrichRequest {
    #[serde(default)]
    pub prompt: String,
    pub context: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AutomationResponse {
    pub results: Vec<StepOutcome>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactSent {
    pub sent: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: DispatcherState) -> Router {
    let health_routes = Router::new().route("/health", get(health::health)).with_state(
        HealthState { service: "dispatcher", capabilities: state.capabilities },
    );

    Router::new()
        .route("/api/price", post(price))
        .route("/api/queue", post(queue))
        .route("/api/enrich", post(enrich))
        .route("/api/automation", post(automation))
        .route("/api/contact", post(contact))
        .method_not_allowed_fallback(api::not_found)
        .with_state(state)
        .merge(health_routes)
        .fallback(api::not_found)
        .layer(CatchPanicLayer::custom(api::handle_panic))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn price(
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResult>, ApiFailure> {
    let Json(request) = body.map_err(|_| bad_request("Invalid input"))?;
    let quote = price_quote(&request);
    info!(
        event_name = "dispatcher.price.quoted",
        service_type = %request.service_type,
        total = quote.total,
        "quote computed"
    );
    Ok(Json(quote))
}

pub async fn queue(
    State(state): State<DispatcherState>,
    body: Result<Json<QueueRequest>, JsonRejection>,
) -> Result<Json<QueueAccepted>, ApiFailure> {
    let Json(request) = body.map_err(|_| bad_request("Invalid input"))?;
    if request.task_name.trim().is_empty() {
        return Err(bad_request("taskName is required"));
    }

    let task = QueuedTask::new(request.task_name, request.payload);
    // Best effort: a failed forward is logged and still reported as queued.
    if let Err(error) = state.queue.send(&task).await {
        warn!(
            event_name = "dispatcher.queue.forward_failed",
            task_name = %task.task_name,
            error = %error,
            "queue forward failed"
        );
    }
    Ok(Json(QueueAccepted { queued: true }))
}

pub async fn enrich(
    State(state): State<DispatcherState>,
    body: Result<Json<EnrichRequest>, JsonRejection>,
) -> Result<Json<EnrichResponse>, ApiFailure> {
    let Json(request) = body.map_err(|_| bad_request("Invalid input"))?;
    if request.prompt.trim().is_empty() {
        return Err(bad_request("prompt is required"));
    }

    let context = request.context.unwrap_or_else(|| Value::Object(Default::default()));
    let message = state.enricher.enrich(&request.prompt, &context).await;
    Ok(Json(EnrichResponse { message }))
}

pub async fn automation(
    State(state): State<DispatcherState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AutomationResponse>, ApiFailure> {
    let Json(request) = body.map_err(|_| bad_request("Invalid input"))?;

    let Some(Value::Array(raw_steps)) = request.get("steps").cloned() else {
        return Err(bad_request("steps must be a non-empty array"));
    };
    if raw_steps.is_empty() {
        return Err(bad_request("steps must be a non-empty array"));
    }

    let steps: Vec<AutomationStep> = raw_steps
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|_| AutomationStep {
                step_type: String::new(),
                params: Value::Object(Default::default()),
            })
        })
        .collect();

    let results = run_steps(&state.enricher, state.queue.as_ref(), steps).await;
    info!(
        event_name = "dispatcher.automation.completed",
        step_count = results.len(),
        "automation batch finished"
    );
    Ok(Json(AutomationResponse { results }))
}

pub async fn contact(
    State(state): State<DispatcherState>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactSent>, ApiFailure> {
    let Json(request) = body.map_err(|_| bad_request("Invalid input"))?;
    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.message.trim().is_empty()
    {
        return Err(bad_request("Name, email, and message are required"));
    }

    let details = ContactDetails {
        name: request.name,
        email: request.email,
        phone: request.phone,
        message: request.message,
        image_url: request.image_url,
    };
    let notification = operator_notification(&state.email_routes, &details);

    if let Err(send_error) = state.mailer.send(&notification).await {
        error!(
            event_name = "dispatcher.contact.email_failed",
            error = %send_error,
            "operator notification failed"
        );
        return Err((
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(api::ApiError::new("Failed to send email")),
        ));
    }

    info!(event_name = "dispatcher.contact.notified", "operator notification sent");
    Ok(Json(ContactSent { sent: true }))
}
