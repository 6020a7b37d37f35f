use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("email endpoint returned status {0}")]
    Status(u16),
}

/// One outbound email in the wire shape the email API expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

/// Client for a Resend-compatible transactional email endpoint.
pub struct ResendMailer {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl ResendMailer {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: SecretString) -> Self {
        Self { http, endpoint: endpoint.into(), api_key }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                event_name = "outbound.email.status_error",
                status = status.as_u16(),
                body = %body,
                "email endpoint rejected the message"
            );
            return Err(EmailError::Status(status.as_u16()));
        }

        info!(
            event_name = "outbound.email.sent",
            subject = %message.subject,
            "email accepted by provider"
        );
        Ok(())
    }
}

/// Used when no email credentials are configured; sends succeed silently.
#[derive(Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        info!(
            event_name = "outbound.email.skipped",
            subject = %message.subject,
            "email credentials not configured, skipping send"
        );
        Ok(())
    }
}
