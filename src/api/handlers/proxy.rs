//! The forwarding handler: validates the query, maps the action onto the
//! right short.io upstream, and relays the JSON response.

use crate::domain::action::Action;
use crate::error::AppError;
use crate::infrastructure::http::API_KEY_HEADER;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

/// Recognized query parameters. Unknown parameters are ignored.
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub action: Option<String>,
    #[serde(rename = "domainId")]
    pub domain_id: Option<String>,
    #[serde(rename = "linkId")]
    pub link_id: Option<String>,
    pub period: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub tz: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "pageToken")]
    pub page_token: Option<String>,
}

/// Forwards one dashboard query to short.io.
///
/// # Endpoint
///
/// `GET /shortio-api?action=...`
///
/// The caller's key arrives in `X-Api-Key` and travels upstream as
/// `Authorization`. Success responses are relayed verbatim as JSON.
///
/// # Errors
///
/// Returns 400 when the key header, the action, or the action's required
/// identifier is missing. Upstream failures are wrapped as
/// `{error, status, details}` with the upstream status propagated; transport
/// failures map to 502.
pub async fn proxy_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ProxyQuery>,
) -> Result<Json<Value>, AppError> {
    let credential = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthenticated)?;

    let action = query
        .action
        .as_deref()
        .and_then(Action::parse)
        .ok_or_else(|| AppError::validation("Invalid action parameter."))?;

    let target = upstream_url(&state, action, &query)?;
    debug!("Forwarding {action} to {target}");

    let accept = if action.is_stats() { "*/*" } else { "application/json" };
    let response = state
        .http
        .get(target)
        .header(reqwest::header::ACCEPT, accept)
        .header(reqwest::header::AUTHORIZATION, credential)
        .send()
        .await
        .map_err(|e| AppError::network(format!("Upstream request failed for {action}: {e}")))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::network(format!("Failed to read upstream body for {action}: {e}")))?;

    if !(200..300).contains(&status) {
        error!("Upstream error for {action} (status {status}): {body}");
        let details = serde_json::from_str(&body).unwrap_or(Value::String(body));
        return Err(AppError::api(
            status,
            format!("Short.io API request failed for {action}"),
            details,
        ));
    }

    let payload: Value = serde_json::from_str(&body).map_err(|e| {
        error!("Unparseable upstream body for {action}: {e}");
        AppError::internal(format!("Function error processing {action}: {e}"))
    })?;

    Ok(Json(payload))
}

/// Builds the upstream URL for an action, enforcing its required identifier.
fn upstream_url(state: &AppState, action: Action, query: &ProxyQuery) -> Result<Url, AppError> {
    let config = &state.config;
    let period = query.period.as_deref().unwrap_or("last30");
    let tz = query.tz.as_deref().unwrap_or("UTC");
    let limit = query.limit.as_deref().unwrap_or("50");

    let raw = match action {
        Action::ListDomains => {
            format!("{}/api/domains?limit=100&offset=0", config.shortio_api_base)
        }
        Action::GetDomainStats => {
            let domain_id = query
                .domain_id
                .as_deref()
                .ok_or_else(|| AppError::validation("domainId parameter is required."))?;
            format!(
                "{}/statistics/domain/{domain_id}",
                config.shortio_stats_base
            )
        }
        Action::ListDomainLinks => {
            let domain_id = query.domain_id.as_deref().ok_or_else(|| {
                AppError::validation("domain_id parameter is required for list-domain-links.")
            })?;
            format!(
                "{}/api/links?domain_id={domain_id}&limit={limit}",
                config.shortio_api_base
            )
        }
        Action::GetLinkStats => {
            let link_id = query
                .link_id
                .as_deref()
                .ok_or_else(|| AppError::validation("linkId parameter is required."))?;
            format!("{}/statistics/link/{link_id}", config.shortio_stats_base)
        }
        Action::GetLinkInfo => {
            let link_id = query
                .link_id
                .as_deref()
                .ok_or_else(|| AppError::validation("linkId parameter is required."))?;
            format!("{}/links/{link_id}", config.shortio_api_base)
        }
    };

    let mut url = Url::parse(&raw)
        .map_err(|e| AppError::internal(format!("Invalid upstream URL for {action}: {e}")))?;

    if action.is_stats() {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("period", period);
        pairs.append_pair("tz", tz);
        if period == "custom" {
            if let Some(start) = &query.start_date {
                pairs.append_pair("startDate", start);
            }
            if let Some(end) = &query.end_date {
                pairs.append_pair("endDate", end);
            }
        }
    } else if action == Action::ListDomainLinks {
        if let Some(token) = &query.page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }
    }

    Ok(url)
}
