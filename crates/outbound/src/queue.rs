use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("queue endpoint returned status {0}")]
    Status(u16),
}

/// One task message: `{taskName, payload}` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedTask {
    pub task_name: String,
    pub payload: Value,
}

impl QueuedTask {
    pub fn new(task_name: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            task_name: task_name.into(),
            payload: payload.unwrap_or_else(|| Value::Object(serde_json::Map::new())),
        }
    }
}

/// Best-effort enqueue. There is no delivery confirmation and no retry;
/// callers swallow errors and report success regardless.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn send(&self, task: &QueuedTask) -> Result<(), QueueError>;
}

/// Forwards tasks to an HTTP queue endpoint.
pub struct HttpQueue {
    http: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl HttpQueue {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        token: Option<SecretString>,
    ) -> Self {
        Self { http, endpoint: endpoint.into(), token }
    }
}

#[async_trait]
impl TaskQueue for HttpQueue {
    async fn send(&self, task: &QueuedTask) -> Result<(), QueueError> {
        let mut request = self.http.post(&self.endpoint).json(task);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(
                event_name = "outbound.queue.status_error",
                status = status.as_u16(),
                task_name = %task.task_name,
                "queue endpoint rejected the task"
            );
            return Err(QueueError::Status(status.as_u16()));
        }

        debug!(
            event_name = "outbound.queue.sent",
            task_name = %task.task_name,
            "task forwarded to queue"
        );
        Ok(())
    }
}

/// Used when no queue is bound; the enqueue is unobservable to the caller.
#[derive(Default)]
pub struct NoopQueue;

#[async_trait]
impl TaskQueue for NoopQueue {
    async fn send(&self, task: &QueuedTask) -> Result<(), QueueError> {
        debug!(
            event_name = "outbound.queue.unbound",
            task_name = %task.task_name,
            "no queue binding configured, dropping task"
        );
        Ok(())
    }
}
