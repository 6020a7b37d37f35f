//! Customer gateway: chat, contact form, image upload, and passthrough
//! proxying of every other `/api/*` path to the dispatcher. Non-API paths
//! serve the customer-facing static assets.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, Request, State,
    },
    http::header::{HeaderName, CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use chrono::Utc;
use paintd_core::{submission_id, ContactRecord};
use paintd_enrich::Enricher;
use paintd_outbound::{AnalyticsEvent, AnalyticsSink, Mailer};
use paintd_store::{ObjectStore, PublicBucket, RecordStore};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};
use tracing::{error, info, warn};

use crate::api::{self, bad_gateway, bad_request, server_error, ApiFailure};
use crate::health::{self, Capabilities, HealthState};
use crate::notify::{customer_auto_reply, operator_notification, ContactDetails, EmailRoutes};

/// Shown to the customer when enrichment produced nothing usable.
const CHAT_FALLBACK: &str = "I apologize, but I cannot provide a response right now. \
Please feel free to contact us directly.";

const ANALYTICS_SNIPPET_LEN: usize = 100;

#[derive(Clone)]
pub struct GatewayState {
    pub enricher: Arc<Enricher>,
    pub mailer: Arc<dyn Mailer>,
    pub records: Arc<dyn RecordStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub bucket: PublicBucket,
    pub email_routes: EmailRoutes,
    pub http: reqwest::Client,
    pub dispatcher_url: String,
    pub capabilities: Capabilities,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub context: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ContactAccepted {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: GatewayState, asset_dir: &Path) -> Router {
    let health_routes = Router::new().route("/health", get(health::health)).with_state(
        HealthState { service: "gateway", capabilities: state.capabilities },
    );

    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/contact", post(contact))
        .route("/api/upload", post(upload))
        .route("/api/{*rest}", any(proxy))
        // Wrong methods on the three handled paths go upstream like any
        // other unmatched API request.
        .method_not_allowed_fallback(proxy)
        .with_state(state)
        .merge(health_routes)
        .fallback_service(ServeDir::new(asset_dir))
        .layer(CatchPanicLayer::custom(api::handle_panic))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn chat(
    State(state): State<GatewayState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiFailure> {
    let Json(request) = body.map_err(|_| bad_request("Invalid input"))?;
    if request.message.trim().is_empty() {
        return Err(bad_request("Message is required"));
    }

    let mut context = match request.context {
        Some(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    context.insert("source".to_string(), json!("customer_chat"));
    context.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));
    let context = Value::Object(context);

    let reply = state.enricher.enrich(&request.message, &context).await;
    let reply = if reply.trim().is_empty() { CHAT_FALLBACK.to_string() } else { reply };

    state
        .analytics
        .record(AnalyticsEvent::new(
            "chat_interaction",
            json!({
                "message": snippet(&request.message),
                "response": snippet(&reply),
                "timestamp": Utc::now().to_rfc3339(),
            }),
        ))
        .await;

    Ok(Json(ChatResponse { response: reply, success: true }))
}

pub async fn contact(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ContactAccepted>, ApiFailure> {
    let form = read_contact_form(multipart).await?;
    if form.name.trim().is_empty()
        || form.email.trim().is_empty()
        || form.message.trim().is_empty()
    {
        return Err(bad_request("Missing required fields"));
    }

    let mut record =
        ContactRecord::new(form.name, form.email, form.phone, form.message);

    if let Some(file) = form.image {
        let key = format!("{}-{}", record.id, file.filename);
        state.objects.put(&key, &file.content_type, file.bytes).await.map_err(|store_error| {
            error!(
                event_name = "gateway.contact.object_write_failed",
                key = %key,
                error = %store_error,
                "image write failed"
            );
            server_error()
        })?;
        record.image_url = Some(state.bucket.url_for(&key));
    }

    let value = serde_json::to_value(&record).map_err(|_| server_error())?;
    state.records.put(&record.id, &value).await.map_err(|store_error| {
        error!(
            event_name = "gateway.contact.record_write_failed",
            submission_id = %record.id,
            error = %store_error,
            "record write failed"
        );
        server_error()
    })?;

    state
        .analytics
        .record(AnalyticsEvent::new(
            "contact_submission",
            json!({ "submissionId": record.id, "hasImage": record.image_url.is_some() }),
        ))
        .await;

    // Fire and forget: neither email can fail the submission.
    let details = ContactDetails {
        name: record.name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        message: record.message.clone(),
        image_url: record.image_url.clone(),
    };
    if let Err(send_error) = state.mailer.send(&operator_notification(&state.email_routes, &details)).await
    {
        warn!(
            event_name = "gateway.contact.notify_failed",
            error = %send_error,
            "operator notification failed"
        );
    }
    if let Err(send_error) =
        state.mailer.send(&customer_auto_reply(&state.email_routes, &details)).await
    {
        warn!(
            event_name = "gateway.contact.auto_reply_failed",
            error = %send_error,
            "customer auto-reply failed"
        );
    }

    info!(
        event_name = "gateway.contact.accepted",
        submission_id = %record.id,
        has_image = record.image_url.is_some(),
        "contact submission stored"
    );
    Ok(Json(ContactAccepted { success: true }))
}

pub async fn upload(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiFailure> {
    let mut multipart = multipart.map_err(|_| server_error())?;

    let mut file: Option<UploadedFile> = None;
    while let Some(field) = multipart.next_field().await.map_err(|_| server_error())? {
        if field.name() == Some("image") {
            file = read_file_field(field).await?;
        }
    }

    let Some(file) = file else {
        return Err(bad_request("No file uploaded"));
    };

    let key = format!("{}-{}", submission_id(), file.filename);
    state.objects.put(&key, &file.content_type, file.bytes).await.map_err(|store_error| {
        error!(
            event_name = "gateway.upload.object_write_failed",
            key = %key,
            error = %store_error,
            "image write failed"
        );
        server_error()
    })?;

    let url = state.bucket.url_for(&key);
    state
        .analytics
        .record(AnalyticsEvent::new("image_upload", json!({ "key": key })))
        .await;

    Ok(Json(UploadResponse { url }))
}

/// Forwards an unmatched `/api/*` request to the dispatcher, preserving
/// method, headers, and body, and relays the upstream status and body.
pub async fn proxy(State(state): State<GatewayState>, request: Request) -> Response {
    let method = request.method().clone();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let headers = request.headers().clone();

    let body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return server_error().into_response(),
    };

    let url = format!("{}{path_and_query}", state.dispatcher_url.trim_end_matches('/'));
    let mut upstream = state.http.request(method.clone(), &url).body(body);
    for (name, value) in headers.iter().filter(|(name, _)| forwardable(name)) {
        upstream = upstream.header(name, value);
    }

    match upstream.send().await {
        Ok(upstream_response) => {
            let status = upstream_response.status();
            let upstream_content_type =
                upstream_response.headers().get(CONTENT_TYPE).cloned();
            let bytes = upstream_response.bytes().await.unwrap_or_default();

            let mut response = (status, bytes).into_response();
            if let Some(value) = upstream_content_type {
                response.headers_mut().insert(CONTENT_TYPE, value);
            }
            response
        }
        Err(proxy_error) => {
            error!(
                event_name = "gateway.proxy.upstream_failed",
                method = %method,
                path = %path_and_query,
                error = %proxy_error,
                "dispatcher unreachable"
            );
            bad_gateway().into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct ContactForm {
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
    image: Option<UploadedFile>,
}

async fn read_contact_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ContactForm, ApiFailure> {
    let mut multipart = multipart.map_err(|_| server_error())?;
    let mut form = ContactForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|_| server_error())? {
        match field.name() {
            Some("name") => form.name = field.text().await.map_err(|_| server_error())?,
            Some("email") => form.email = field.text().await.map_err(|_| server_error())?,
            Some("phone") => {
                let phone = field.text().await.map_err(|_| server_error())?;
                if !phone.trim().is_empty() {
                    form.phone = Some(phone);
                }
            }
            Some("message") => form.message = field.text().await.map_err(|_| server_error())?,
            Some("image") => form.image = read_file_field(field).await?,
            _ => {}
        }
    }

    Ok(form)
}

/// Extracts one uploaded file. Empty files count as absent.
async fn read_file_field(
    field: axum::extract::multipart::Field<'_>,
) -> Result<Option<UploadedFile>, ApiFailure> {
    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type =
        field.content_type().unwrap_or("application/octet-stream").to_string();
    let bytes = field.bytes().await.map_err(|_| server_error())?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile { filename, content_type, bytes: bytes.to_vec() }))
}

fn snippet(text: &str) -> String {
    text.chars().take(ANALYTICS_SNIPPET_LEN).collect()
}

/// Connection-scoped headers stay on this hop; reqwest recomputes host and
/// content-length for the upstream request.
fn forwardable(name: &HeaderName) -> bool {
    !matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "host"
            | "content-length"
    )
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
    };
    use httpmock::prelude::*;
    use paintd_outbound::{EmailError, EmailMessage, MemoryAnalytics, NoopMailer};
    use paintd_store::{InMemoryObjectStore, InMemoryRecordStore};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::dispatcher::{self, DispatcherState};
    use paintd_outbound::NoopQueue;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: &EmailMessage) -> Result<(), EmailError> {
            Err(EmailError::Status(500))
        }
    }

    struct Fixture {
        records: Arc<InMemoryRecordStore>,
        objects: Arc<InMemoryObjectStore>,
        analytics: Arc<MemoryAnalytics>,
        assets: TempDir,
        state: GatewayState,
    }

    fn fixture() -> Fixture {
        fixture_with_dispatcher("http://127.0.0.1:9".to_string())
    }

    fn fixture_with_dispatcher(dispatcher_url: String) -> Fixture {
        let records = Arc::new(InMemoryRecordStore::default());
        let objects = Arc::new(InMemoryObjectStore::default());
        let analytics = Arc::new(MemoryAnalytics::default());
        let assets = TempDir::new().expect("temp asset dir");

        let state = GatewayState {
            enricher: Arc::new(Enricher::unconfigured()),
            mailer: Arc::new(NoopMailer),
            records: records.clone(),
            objects: objects.clone(),
            analytics: analytics.clone(),
            bucket: PublicBucket::new("paint-uploads", "r2.cloudflarestorage.com"),
            email_routes: EmailRoutes {
                source_address: "contact@brush-and-ladder.example".to_string(),
                operator_address: "office@brush-and-ladder.example".to_string(),
                company_name: "Brush & Ladder Painting".to_string(),
            },
            http: reqwest::Client::new(),
            dispatcher_url,
            capabilities: Capabilities {
                llm: false,
                email: false,
                queue: false,
                object_store: false,
            },
        };

        Fixture { records, objects, analytics, assets, state }
    }

    fn fixture_with_mailer(mailer: Arc<dyn Mailer>) -> Fixture {
        let mut fixture = fixture();
        fixture.state.mailer = mailer;
        fixture
    }

    fn gateway_router(fixture: &Fixture) -> Router {
        router(fixture.state.clone(), fixture.assets.path())
    }

    async fn json_response(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn multipart_body(boundary: &str, fields: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, filename, value) in fields {
            body.push_str(&format!("--{boundary}\r\n"));
            match filename {
                Some(filename) => {
                    body.push_str(&format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    ));
                    body.push_str("Content-Type: image/jpeg\r\n\r\n");
                }
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        body
    }

    #[tokio::test]
    async fn chat_requires_message() {
        let fixture = fixture();
        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"  "}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_response(response).await["error"], "Message is required");
    }

    #[tokio::test]
    async fn chat_degrades_and_records_analytics() {
        let fixture = fixture();
        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"Do you paint cabinets?"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["response"], "No enrichment provider configured.");

        let events = fixture.analytics.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "chat_interaction");
        assert_eq!(events[0].payload["message"], "Do you paint cabinets?");
    }

    #[tokio::test]
    async fn contact_rejects_missing_required_fields() {
        let fixture = fixture();
        let boundary = "xYzBoundary";
        let body = multipart_body(boundary, &[("name", None, "Dana")]);

        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_response(response).await["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn contact_stores_record_and_image_under_submission_id() {
        let fixture = fixture();
        let boundary = "xYzBoundary";
        let body = multipart_body(
            boundary,
            &[
                ("name", None, "Dana"),
                ("email", None, "dana@example.com"),
                ("phone", None, "555-0100"),
                ("message", None, "Two bedrooms and a hallway"),
                ("image", Some("deck.jpg"), "jpegbytes"),
            ],
        );

        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_response(response).await, json!({"success": true}));

        assert_eq!(fixture.records.len().await, 1);
        let keys = fixture.objects.keys().await;
        assert_eq!(keys.len(), 1);
        assert!(keys[0].ends_with("-deck.jpg"));

        let (content_type, bytes) = fixture.objects.get(&keys[0]).await.expect("stored image");
        assert_eq!(content_type, "image/jpeg");
        assert_eq!(bytes, b"jpegbytes");

        let events = fixture.analytics.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "contact_submission");
        assert_eq!(events[0].payload["hasImage"], json!(true));
    }

    #[tokio::test]
    async fn contact_succeeds_even_when_emails_fail() {
        let fixture = fixture_with_mailer(Arc::new(FailingMailer));
        let boundary = "xYzBoundary";
        let body = multipart_body(
            boundary,
            &[
                ("name", None, "Dana"),
                ("email", None, "dana@example.com"),
                ("message", None, "Two bedrooms and a hallway"),
            ],
        );

        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_response(response).await, json!({"success": true}));

        // The submission still landed; only the notifications were lost.
        assert_eq!(fixture.records.len().await, 1);
        let events = fixture.analytics.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "contact_submission");
    }

    #[tokio::test]
    async fn upload_without_file_is_rejected() {
        let fixture = fixture();
        let boundary = "xYzBoundary";
        let body = multipart_body(boundary, &[("note", None, "no image here")]);

        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/upload")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_response(response).await["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn upload_returns_public_bucket_url() {
        let fixture = fixture();
        let boundary = "xYzBoundary";
        let body = multipart_body(boundary, &[("image", Some("deck.jpg"), "jpegbytes")]);

        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/upload")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        let url = body["url"].as_str().expect("url");
        assert!(url.starts_with("https://paint-uploads.r2.cloudflarestorage.com/"));
        assert!(url.ends_with("-deck.jpg"));

        let events = fixture.analytics.events().await;
        assert_eq!(events[0].event, "image_upload");
    }

    #[tokio::test]
    async fn unmatched_api_path_is_proxied_to_the_dispatcher() {
        // Real dispatcher on a local listener so the proxy path is exercised
        // end to end.
        let dispatcher_state = DispatcherState {
            enricher: Arc::new(Enricher::unconfigured()),
            queue: Arc::new(NoopQueue),
            mailer: Arc::new(NoopMailer),
            email_routes: EmailRoutes {
                source_address: "contact@brush-and-ladder.example".to_string(),
                operator_address: "office@brush-and-ladder.example".to_string(),
                company_name: "Brush & Ladder Painting".to_string(),
            },
            capabilities: Capabilities {
                llm: false,
                email: false,
                queue: false,
                object_store: false,
            },
        };
        let listener =
            tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind dispatcher");
        let address = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, dispatcher::router(dispatcher_state)).await.expect("serve");
        });

        let fixture = fixture_with_dispatcher(format!("http://{address}"));
        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/price")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"serviceType":"interior","squareFeet":500}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["basePrice"], json!(750.0));
    }

    #[tokio::test]
    async fn proxy_forwards_request_headers_to_the_dispatcher() {
        let upstream = MockServer::start_async().await;
        let queue_mock = upstream
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/queue")
                    .header("authorization", "Bearer edge-token")
                    .header("x-request-id", "req-7431")
                    .header("content-type", "application/json");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"queued": true}));
            })
            .await;

        let fixture = fixture_with_dispatcher(upstream.base_url());
        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/queue")
                    .header("content-type", "application/json")
                    .header("authorization", "Bearer edge-token")
                    .header("x-request-id", "req-7431")
                    .body(Body::from(r#"{"taskName":"follow_up"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_response(response).await, json!({"queued": true}));
        queue_mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_dispatcher_maps_to_bad_gateway() {
        let fixture = fixture();
        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/api/price")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn non_api_paths_serve_static_assets() {
        let fixture = fixture();
        std::fs::write(fixture.assets.path().join("style.css"), "body { color: navy; }")
            .expect("write asset");

        let response = gateway_router(&fixture)
            .oneshot(
                HttpRequest::builder().uri("/style.css").body(Body::empty()).expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(bytes.as_ref(), b"body { color: navy; }");
    }
}
