//! # Request/Response Logging Middleware
//!
//! One line when a request enters, one when its response leaves, both
//! tagged with the request id from the [`ContextStore`]. Credential-bearing
//! headers are redacted, and the `api_key` query parameter is masked.
//! Response lines are logged at `info` for success, `warn` for 4xx and
//! `error` for 5xx.

use crate::auth::api_key::{mask_query, REDACTED};
use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use lib_core::ContextStore;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Headers whose values never reach the logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key", "x-auth-token", "proxy-authorization"];

fn sanitized_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                Some((name.to_string(), REDACTED.to_string()))
            } else {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            }
        })
        .collect()
}

pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = ContextStore::request_id_or_unknown();
    let client_ip = ContextStore::get().map(|ctx| ctx.client_ip);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(mask_query);

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = ?query,
        user_agent = ?user_agent,
        client_ip = ?client_ip,
        "[REQUEST] {} {}",
        method,
        path
    );

    debug!(
        request_id = %request_id,
        headers = ?sanitized_headers(req.headers()),
        "[REQUEST HEADERS]"
    );

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms) [SERVER ERROR]",
            method,
            path,
            status,
            duration.as_millis()
        );
    } else if response.status().is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms) [CLIENT ERROR]",
            method,
            path,
            status,
            duration.as_millis()
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms)",
            method,
            path,
            status,
            duration.as_millis()
        );
    }

    response
}
