use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::client::{ChatClient, ChatMessage};

/// Fixed system instruction for every enrichment exchange.
pub const SYSTEM_INSTRUCTION: &str = "You are an assistant for a painting services \
company that helps with customer communications and lead enrichment. Use the provided \
context to tailor your responses. Keep answers concise and professional.";

/// Returned when no provider key is configured. A successful response, not an
/// error: enrichment degrades instead of failing the caller.
pub const NO_PROVIDER_MESSAGE: &str = "No enrichment provider configured.";

/// Returned when the provider call fails. Also a successful response.
pub const PROVIDER_FAILED_MESSAGE: &str = "Failed to contact enrichment service.";

/// Prompt/context composition over an optional [`ChatClient`].
pub struct Enricher {
    client: Option<Arc<dyn ChatClient>>,
}

impl Enricher {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client: Some(client) }
    }

    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Enrich a prompt with the given context. Never fails and never retries;
    /// degraded outcomes surface as the static fallback strings.
    pub async fn enrich(&self, prompt: &str, context: &Value) -> String {
        let Some(client) = &self.client else {
            return NO_PROVIDER_MESSAGE.to_string();
        };

        let messages = [
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(format!("{prompt}\n\nContext: {context}")),
        ];

        match client.complete(&messages).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(
                    event_name = "enrich.provider.call_failed",
                    error = %error,
                    "enrichment provider call failed, returning fallback message"
                );
                PROVIDER_FAILED_MESSAGE.to_string()
            }
        }
    }
}
