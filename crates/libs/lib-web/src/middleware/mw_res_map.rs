//! # Response Mapping Middleware
//!
//! Last stop before the response leaves the application stack. Guarantees
//! every response body is an envelope:
//!
//! - a response carrying an [`Error`] in its extensions is translated;
//! - a 2xx JSON (or text) body is normalized into a success envelope;
//! - any other 4xx/5xx body is treated as a bare HTTP failure, unless it is
//!   already an envelope.
//!
//! `204 No Content`, `1xx` and `3xx` pass through untouched.
//!
//! Handler panics are caught by a `CatchPanicLayer` sitting just inside
//! this middleware; [`panic_to_error`] turns them into
//! [`Error::Unexpected`] so they get the generic 500 envelope.

use crate::auth::api_key::masked_path_and_query;
use crate::error::{Error, HttpMessage};
use crate::response::{normalize, translate};
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use lib_core::dto::ResponseEnvelope;
use lib_core::ContextStore;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

pub async fn map_res(req: Request, next: Next) -> Response {
    let raw_path = masked_path_and_query(req.uri());

    let res = next.run(req).await;

    if let Some(err) = res.extensions().get::<Arc<Error>>().cloned() {
        return translate(&err, &raw_path).into_response();
    }

    let status = res.status();
    if status == StatusCode::NO_CONTENT {
        res
    } else if status.is_success() {
        wrap_success(res, &raw_path).await
    } else if status.is_client_error() || status.is_server_error() {
        wrap_failure(res, &raw_path).await
    } else {
        res
    }
}

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer::custom`.
/// The payload is only logged; the client sees the generic message.
pub fn panic_to_error(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    Error::Unexpected(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

async fn wrap_success(res: Response, raw_path: &str) -> Response {
    let (mut parts, body) = res.into_parts();
    let bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(err) => return translate(&err, raw_path).into_response(),
    };

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    let normalized = normalize(value, &ContextStore::request_id_or_unknown());
    let body = match serde_json::to_vec(&normalized) {
        Ok(body) => body,
        Err(err) => {
            let err = Error::Unexpected(anyhow::Error::new(err).context("serializing success envelope"));
            return translate(&err, raw_path).into_response();
        }
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Response::from_parts(parts, Body::from(body))
}

async fn wrap_failure(res: Response, raw_path: &str) -> Response {
    let (mut parts, body) = res.into_parts();
    let bytes = read_body(body).await.unwrap_or_default();

    if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
        if ResponseEnvelope::is_envelope(&value) {
            let stamped = normalize(value, &ContextStore::request_id_or_unknown()).into_value();
            parts.headers.remove(header::CONTENT_LENGTH);
            return Response::from_parts(parts, Body::from(stamped.to_string()));
        }
    }

    let message = HttpMessage::from_body(&bytes).unwrap_or_else(|| {
        HttpMessage::Text(parts.status.canonical_reason().unwrap_or("Error").to_string())
    });
    translate(&Error::Http { status: parts.status, message }, raw_path).into_response()
}

async fn read_body(body: Body) -> Result<Bytes, Error> {
    to_bytes(body, usize::MAX)
        .await
        .map_err(|e| Error::Unexpected(anyhow::Error::new(e).context("reading response body")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::stamp_req;
    use axum::{middleware, routing::get, Json, Router};
    use lib_core::dto::{Page, PageQuery};
    use lib_core::AppError;
    use serde_json::json;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    fn app() -> Router {
        Router::new()
            .route("/object", get(|| async { Json(json!({ "id": 7 })) }))
            .route("/text", get(|| async { "pong" }))
            .route(
                "/page",
                get(|| async {
                    let query = PageQuery { page: Some(2), limit: Some(10) };
                    Json(Page::new(vec![json!({ "id": 11 })], &query, 45))
                }),
            )
            .route(
                "/enveloped",
                get(|| async { Json(json!({ "status": "success", "data": [1, 2] })) }),
            )
            .route(
                "/domain",
                get(|| async { Err::<(), Error>(AppError::Conflict("Project name already taken".into()).into()) }),
            )
            .route(
                "/bare",
                get(|| async { (StatusCode::FORBIDDEN, Json(json!({ "message": ["a is required", "b is required"] }))) }),
            )
            .route("/empty-teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
            .route("/no-content", get(|| async { StatusCode::NO_CONTENT }))
            .route(
                "/panics",
                get(|| async {
                    let missing: Option<u8> = None;
                    Json(json!({ "value": missing.expect("value must be loaded") }))
                }),
            )
            .layer(CatchPanicLayer::custom(panic_to_error))
            .layer(middleware::from_fn(map_res))
            .layer(middleware::from_fn(stamp_req))
    }

    async fn call(path: &str) -> (StatusCode, String, Value) {
        let res = app()
            .oneshot(axum::http::Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let header = res.headers()["x-request-id"].to_str().unwrap().to_string();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, header, body)
    }

    #[tokio::test]
    async fn test_object_wrapped_with_header_id() {
        let (status, rid, body) = call("/object").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "success", "request_id": rid, "data": { "id": 7 } }));
    }

    #[tokio::test]
    async fn test_text_wrapped_as_string() {
        let (_, _, body) = call("/text").await;
        assert_eq!(body["data"], "pong");
    }

    #[tokio::test]
    async fn test_page_gets_pagination_meta() {
        let (_, _, body) = call("/page").await;
        assert_eq!(body["data"], json!([{ "id": 11 }]));
        assert_eq!(
            body["meta"]["pagination"],
            json!({ "page": 2, "limit": 10, "total_items": 45, "total_pages": 5 })
        );
    }

    #[tokio::test]
    async fn test_existing_envelope_only_stamped() {
        let (_, rid, body) = call("/enveloped").await;
        assert_eq!(body, json!({ "status": "success", "data": [1, 2], "request_id": rid }));
    }

    #[tokio::test]
    async fn test_domain_error_translated() {
        let (status, rid, body) = call("/domain").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");
        assert_eq!(body["request_id"], rid);
        assert_eq!(body["error"]["code"], "CONFLICT_ERROR");
        assert_eq!(body["error"]["message"], "Project name already taken");
        assert_eq!(body["error"]["path"], "/domain");
    }

    #[tokio::test]
    async fn test_bare_error_body_translated() {
        let (status, _, body) = call("/bare").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "AUTHORIZATION_ERROR");
        assert_eq!(body["error"]["details"]["errors"], json!(["a is required", "b is required"]));
    }

    #[tokio::test]
    async fn test_unknown_status_keeps_status_with_internal_code() {
        let (status, _, body) = call("/empty-teapot").await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["error"]["message"], "I'm a teapot");
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_internal_error_envelope() {
        let (status, rid, body) = call("/panics").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["request_id"], rid);
        assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["error"]["path"], "/panics");

        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains(&rid));
        assert!(!message.contains("value must be loaded"));
        assert!(!body.to_string().contains("panicked"));
    }

    #[tokio::test]
    async fn test_api_key_query_masked_in_error_envelope() {
        let (status, _, body) = call("/missing?api_key=ak_SECRET123&page=2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["path"],
            format!("/missing?api_key={}&page=2", crate::auth::api_key::REDACTED)
        );
        assert!(!body.to_string().contains("ak_SECRET123"));
    }

    #[tokio::test]
    async fn test_no_content_passes_through() {
        let (status, _, body) = call("/no-content").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }
}
