use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::StoreError;

/// Public URL convention for stored objects. The URL is derived, never
/// verified: `https://<bucket>.<domain>/<key>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicBucket {
    pub name: String,
    pub domain: String,
}

impl PublicBucket {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self { name: name.into(), domain: domain.into() }
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("https://{}.{}/{key}", self.name, self.domain)
    }
}

/// Blob storage for uploaded files, keyed by `<submission-id>-<filename>`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
}

/// PUTs object bytes to `<endpoint>/<key>` with the declared content type.
pub struct HttpObjectStore {
    http: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl HttpObjectStore {
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
impl ObjectStore for HttpObjectStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let mut request = self
            .http
            .put(format!("{}/{key}", self.endpoint))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(
                event_name = "store.objects.status_error",
                status = status.as_u16(),
                key = %key,
                "object store rejected the upload"
            );
            return Err(StoreError::Status(status.as_u16()));
        }

        debug!(event_name = "store.objects.written", key = %key, "object stored");
        Ok(())
    }
}

/// In-memory backend for tests and keyless local runs.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<String, (String, Vec<u8>)>>,
}

impl InMemoryObjectStore {
    /// Returns `(content_type, bytes)` for a stored key.
    pub async fn get(&self, key: &str) -> Option<(String, Vec<u8>)> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.objects.write().await.insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::{HttpObjectStore, InMemoryObjectStore, ObjectStore, PublicBucket};

    #[test]
    fn public_url_follows_bucket_domain_template() {
        let bucket = PublicBucket::new("paint-uploads", "r2.cloudflarestorage.com");
        assert_eq!(
            bucket.url_for("1700000000000-a1b2c3-deck.jpg"),
            "https://paint-uploads.r2.cloudflarestorage.com/1700000000000-a1b2c3-deck.jpg"
        );
    }

    #[tokio::test]
    async fn in_memory_store_keeps_content_type() {
        let store = InMemoryObjectStore::default();
        store.put("key-deck.jpg", "image/jpeg", vec![0xff, 0xd8]).await.expect("put");

        let (content_type, bytes) = store.get("key-deck.jpg").await.expect("stored");
        assert_eq!(content_type, "image/jpeg");
        assert_eq!(bytes, vec![0xff, 0xd8]);
    }

    #[tokio::test]
    async fn http_store_puts_bytes_with_declared_content_type() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/bucket/key-deck.jpg")
                    .header("content-type", "image/jpeg");
                then.status(200);
            })
            .await;

        let store = HttpObjectStore::new(reqwest::Client::new(), server.url("/bucket"), None);
        store.put("key-deck.jpg", "image/jpeg", vec![1, 2, 3]).await.expect("put");
        mock.assert_async().await;
    }
}
