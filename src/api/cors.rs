//! CORS policy for the forwarding endpoint.
//!
//! Two rules decide whether a request origin gets echoed back in
//! `Access-Control-Allow-Origin`:
//!
//! 1. Exact match against the configured public origin.
//! 2. Both the request origin and the public origin are preview deployments
//!    (hostnames under the preview suffix) of the same project.
//!
//! Any other origin gets the base CORS headers without an allow-origin, so
//! browsers block the cross-origin response themselves.

use crate::config::Config;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use url::Url;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, X-Api-Key";
const MAX_AGE: &str = "86400";

/// Decides the echoed origin, if any, for a request `Origin` header.
pub fn allowed_origin(request_origin: Option<&str>, config: &Config) -> Option<String> {
    let request_origin = request_origin?;
    let public_origin = config.public_origin.as_deref()?;

    if request_origin == public_origin {
        return Some(request_origin.to_string());
    }

    let request_host = Url::parse(request_origin).ok()?.host_str()?.to_string();
    let public_host = Url::parse(public_origin).ok()?.host_str()?.to_string();

    let suffix = &config.preview_domain_suffix;
    let request_project = project_label(&request_host, suffix)?;
    let public_project = project_label(&public_host, suffix)?;
    if request_project == public_project {
        return Some(request_origin.to_string());
    }

    None
}

/// Extracts the project label from a preview hostname: the last subdomain
/// label before the suffix, so `branch.myproject.pages.dev` and
/// `myproject.pages.dev` both yield `myproject`.
fn project_label<'a>(hostname: &'a str, suffix: &str) -> Option<&'a str> {
    let stem = hostname.strip_suffix(suffix)?;
    let label = stem.rsplit('.').next()?;
    (!label.is_empty()).then_some(label)
}

fn apply_headers(headers: &mut HeaderMap, origin: Option<&str>, config: &Config) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE),
    );

    if let Some(echoed) = allowed_origin(origin, config) {
        if let Ok(value) = HeaderValue::from_str(&echoed) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
    }
}

/// Middleware attaching CORS headers to every non-preflight response.
pub async fn layer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let mut response = next.run(request).await;
    apply_headers(response.headers_mut(), origin.as_deref(), &state.config);
    response
}

/// Answers CORS preflights.
///
/// A proper preflight (Origin + requested method + requested headers) gets
/// the full CORS header set; anything else gets a bare `Allow` listing.
pub async fn preflight_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    let is_preflight = origin.is_some()
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_HEADERS);

    if is_preflight {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_headers(response.headers_mut(), origin, &state.config);
        response
    } else {
        let mut response = StatusCode::NO_CONTENT.into_response();
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static(ALLOW_METHODS));
        response
    }
}
