//! # Request Stamping Middleware
//!
//! Outermost application middleware. Generates the request id, builds the
//! [`RequestContext`] and runs the rest of the stack inside
//! [`ContextStore::scope`], so every layer, extractor and handler below
//! reads the same id. The id is echoed back as `X-Request-ID`.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/projects", get(list_projects))
//!     .layer(middleware::from_fn(stamp_req));
//! ```

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use crate::auth::api_key::masked_path_and_query;
use lib_core::{ContextStore, RequestContext};
use rand::rngs::OsRng;
use rand::RngCore;
use std::net::SocketAddr;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const REQUEST_ID_PREFIX: &str = "req_";

/// `req_` followed by 12 lowercase hex chars (48 random bits).
pub fn new_request_id() -> String {
    let mut bytes = [0u8; 6];
    OsRng.fill_bytes(&mut bytes);
    format!("{REQUEST_ID_PREFIX}{}", hex::encode(bytes))
}

/// Best effort: first `x-forwarded-for` hop, `x-real-ip`, then the socket.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| lib_core::ctx::UNKNOWN.to_string())
}

pub async fn stamp_req(req: Request, next: Next) -> Response {
    let peer = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0);
    let path = masked_path_and_query(req.uri());

    let ctx = RequestContext::new(
        new_request_id(),
        req.method().as_str(),
        path,
        client_ip(req.headers(), peer),
    );
    let request_id = ctx.request_id.clone();

    let mut res = ContextStore::scope(ctx, next.run(req)).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_request_id_format() {
        let id = new_request_id();
        assert!(id.starts_with("req_"));
        let suffix = &id[4..];
        assert_eq!(suffix.len(), 12);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_no_collisions_in_ten_thousand() {
        let ids: HashSet<String> = (0..10_000).map(|_| new_request_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_client_ip_precedence() {
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        let mut headers = HeaderMap::new();

        assert_eq!(client_ip(&headers, None), "unknown");
        assert_eq!(client_ip(&headers, Some(peer)), "10.0.0.9");

        headers.insert("x-real-ip", HeaderValue::from_static("172.16.0.2"));
        assert_eq!(client_ip(&headers, Some(peer)), "172.16.0.2");

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&headers, Some(peer)), "203.0.113.7");
    }
}
