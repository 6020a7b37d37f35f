//! Shared JSON API surface: the error envelope, common rejections, and the
//! panic boundary every service router is wrapped in.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Single-field error envelope used by every JSON endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

pub type ApiFailure = (StatusCode, Json<ApiError>);

pub fn bad_request(message: impl Into<String>) -> ApiFailure {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(message)))
}

pub fn server_error() -> ApiFailure {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError::new("Server error")))
}

pub fn bad_gateway() -> ApiFailure {
    (StatusCode::BAD_GATEWAY, Json(ApiError::new("Upstream unavailable")))
}

/// Fallback for unmatched routes on the JSON services.
pub async fn not_found() -> ApiFailure {
    (StatusCode::NOT_FOUND, Json(ApiError::new("Not Found")))
}

/// Converts a handler panic into the same opaque envelope a handler error
/// produces, so clients never see a raw hung connection or an axum default.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(event_name = "server.api.panic", detail = %detail, "handler panicked");
    server_error().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_uses_shared_envelope() {
        let (status, Json(body)) = not_found().await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Not Found");
    }

    #[test]
    fn panic_payload_becomes_opaque_server_error() {
        let response = handle_panic(Box::new("boom".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
