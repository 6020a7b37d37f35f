//! Marketing site: static assets with an analytics bootstrap injected into
//! every HTML page. Non-HTML responses pass through untouched and `/api/*`
//! is a hard 404 on this surface.

use std::path::Path;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};
use tracing::warn;
use uuid::Uuid;

use crate::api;

/// Loads gtag when a measurement id is configured. Injected before `</head>`.
const GA_LOADER: &str = r#"<script async src="https://www.googletagmanager.com/gtag/js?id=__GA_ID__"></script>
<script>
  window.dataLayer = window.dataLayer || [];
  function gtag(){dataLayer.push(arguments);}
  gtag('js', new Date());
  gtag('config', '__GA_ID__');
</script>
"#;

/// Page tracker: session id, GA forwarding, phone/email click listeners and
/// form-start tracking. Injected before `</body>`.
const TRACKER_SNIPPET: &str = r#"<script data-session-id="__SESSION_ID__">
(function () {
  var paintAnalytics = {
    sessionId: '__SESSION_ID__',
    track: function (event, data) {
      if (typeof gtag === 'function') {
        gtag('event', event, Object.assign({ session_id: this.sessionId }, data || {}));
      }
    }
  };
  window.paintAnalytics = paintAnalytics;
  document.addEventListener('DOMContentLoaded', function () {
    document.querySelectorAll('a[href^="tel:"]').forEach(function (link) {
      link.addEventListener('click', function () { paintAnalytics.track('phone_click', {}); });
    });
    document.querySelectorAll('a[href^="mailto:"]').forEach(function (link) {
      link.addEventListener('click', function () { paintAnalytics.track('email_click', {}); });
    });
    document.querySelectorAll('form').forEach(function (form) {
      var started = false;
      form.addEventListener('input', function () {
        if (!started) { started = true; paintAnalytics.track('form_start', {}); }
      });
    });
  });
  paintAnalytics.track('page_view', { path: window.location.pathname });
})();
</script>
"#;

#[derive(Clone)]
pub struct SiteState {
    pub ga_measurement_id: Option<String>,
    pub inject: bool,
}

pub fn router(state: SiteState, asset_dir: &Path) -> Router {
    Router::new()
        .route("/api/{*rest}", any(api_not_available))
        .fallback_service(ServeDir::new(asset_dir))
        .layer(middleware::from_fn_with_state(state, inject_analytics))
        .layer(CatchPanicLayer::custom(api::handle_panic))
}

async fn api_not_available() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Buffers HTML responses and splices the analytics tags in. Every rendered
/// page carries a fresh session id.
async fn inject_analytics(State(state): State<SiteState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if !state.inject {
        return response;
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("text/html"))
        .unwrap_or(false);
    if !is_html {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(read_error) => {
            warn!(
                event_name = "site.inject.body_read_failed",
                error = %read_error,
                "failed to buffer page body"
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut html = match String::from_utf8(bytes.to_vec()) {
        Ok(html) => html,
        // Declared HTML but not UTF-8: serve it untouched.
        Err(_) => {
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::from(bytes));
        }
    };

    let session_id = Uuid::new_v4().to_string();
    if let Some(ga_id) = &state.ga_measurement_id {
        let loader = GA_LOADER.replace("__GA_ID__", ga_id);
        html = html.replacen("</head>", &format!("{loader}</head>"), 1);
    }
    let tracker = TRACKER_SNIPPET.replace("__SESSION_ID__", &session_id);
    html = html.replacen("</body>", &format!("{tracker}</body>"), 1);

    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(html))
}
