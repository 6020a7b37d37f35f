use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// One analytics data point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub event: String,
    pub payload: Value,
}

impl AnalyticsEvent {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self { event: event.into(), payload }
    }
}

/// Best-effort event sink. Recording never fails from the caller's point of
/// view: implementations swallow and log their own errors.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record(&self, event: AnalyticsEvent);
}

/// Default sink: emits the data point into the structured log stream.
#[derive(Default)]
pub struct TracingAnalytics;

#[async_trait]
impl AnalyticsSink for TracingAnalytics {
    async fn record(&self, event: AnalyticsEvent) {
        info!(
            event_name = "analytics.datapoint",
            event = %event.event,
            payload = %event.payload,
            "analytics event recorded"
        );
    }
}

#[derive(Default)]
pub struct NoopAnalytics;

#[async_trait]
impl AnalyticsSink for NoopAnalytics {
    async fn record(&self, _event: AnalyticsEvent) {}
}

/// In-memory sink for asserting on emitted events in tests.
#[derive(Default)]
pub struct MemoryAnalytics {
    events: tokio::sync::Mutex<Vec<AnalyticsEvent>>,
}

impl MemoryAnalytics {
    pub async fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AnalyticsSink for MemoryAnalytics {
    async fn record(&self, event: AnalyticsEvent) {
        self.events.lock().await.push(event);
    }
}
