use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::StoreError;

/// Write-once key-value store for submission records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put(&self, id: &str, record: &Value) -> Result<(), StoreError>;
}

/// PUTs each record as JSON to `<endpoint>/<id>`.
pub struct HttpRecordStore {
    http: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl HttpRecordStore {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        token: Option<SecretString>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self { http, endpoint: endpoint.trim_end_matches('/').to_string(), token }
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn put(&self, id: &str, record: &Value) -> Result<(), StoreError> {
        let mut request = self.http.put(format!("{}/{id}", self.endpoint)).json(record);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(
                event_name = "store.records.status_error",
                status = status.as_u16(),
                id = %id,
                "record store rejected the write"
            );
            return Err(StoreError::Status(status.as_u16()));
        }

        debug!(event_name = "store.records.written", id = %id, "record stored");
        Ok(())
    }
}

/// In-memory backend for tests and keyless local runs.
#[derive(Default)]
pub struct InMemoryRecordStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl InMemoryRecordStore {
    pub async fn get(&self, id: &str) -> Option<Value> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, id: &str, record: &Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(id.to_string(), record.clone());
        Ok(())
    }
}
