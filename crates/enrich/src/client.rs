use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("chat completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chat completion endpoint returned status {0}")]
    Status(u16),
    #[error("chat completion reply had no message content")]
    EmptyReply,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Provider seam for chat completion. One call in, one text reply out; no
/// retries, no streaming.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, EnrichError>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChatClient {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionPayload<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionReply {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChatClient {
    pub fn new(
        http: reqwest::Client,
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, EnrichError> {
        let payload = CompletionPayload {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                event_name = "enrich.provider.status_error",
                status = status.as_u16(),
                body = %body,
                "chat completion provider rejected the request"
            );
            return Err(EnrichError::Status(status.as_u16()));
        }

        let reply: CompletionReply = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(EnrichError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::{ChatClient, ChatMessage, EnrichError, OpenAiChatClient};

    fn client(base_url: &str) -> OpenAiChatClient {
        OpenAiChatClient::new(
            reqwest::Client::new(),
            "sk-test".to_string().into(),
            base_url,
            "gpt-4-turbo",
            256,
            0.7,
        )
    }

    #[tokio::test]
    async fn sends_bearer_auth_and_fixed_sampling_parameters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body_partial(
                        json!({"model": "gpt-4-turbo", "max_tokens": 256, "temperature": 0.7})
                            .to_string(),
                    );
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "  Happy to help.  "}}]
                }));
            })
            .await;

        let reply = client(&server.base_url())
            .complete(&[ChatMessage::system("sys"), ChatMessage::user("hello")])
            .await
            .expect("completion should succeed");

        mock.assert_async().await;
        assert_eq!(reply, "Happy to help.");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).body("slow down");
            })
            .await;

        let error = client(&server.base_url())
            .complete(&[ChatMessage::user("hello")])
            .await
            .expect_err("must fail");
        assert!(matches!(error, EnrichError::Status(429)));
    }

    #[tokio::test]
    async fn empty_choice_list_maps_to_empty_reply() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let error = client(&server.base_url())
            .complete(&[ChatMessage::user("hello")])
            .await
            .expect_err("must fail");
        assert!(matches!(error, EnrichError::EmptyReply));
    }
}
