//! # Error Translator
//!
//! Classifies an escaped [`Error`] and builds the error envelope:
//!
//! | Error                 | code                       | status   | message                 |
//! |-----------------------|----------------------------|----------|-------------------------|
//! | `Domain(AppError)`    | from the error             | fixed    | from the error          |
//! | `Http { status, .. }` | `ErrorCode::from_status`   | original | body text / `errors` list |
//! | `Unexpected`          | `INTERNAL_SERVER_ERROR`    | 500      | generic, with request id |
//!
//! `path` and `timestamp` come from the request context, falling back to
//! the raw request URL and the current time. Every translation is logged
//! with the request id.

use crate::error::{Error, HttpMessage};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lib_core::dto::{ErrorBody, ResponseEnvelope};
use lib_core::{ContextStore, ErrorCode};
use lib_utils::format_time;
use serde_json::{json, Value};
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub status: StatusCode,
    pub envelope: ResponseEnvelope,
}

impl IntoResponse for Translation {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

pub fn translate(err: &Error, raw_path: &str) -> Translation {
    let request_id = ContextStore::request_id_or_unknown();
    let path = ContextStore::path().unwrap_or_else(|| raw_path.to_string());
    let timestamp = format_time(ContextStore::timestamp());

    let (status, code, message, details) = match err {
        Error::Domain(app_err) => (
            app_err.status_code(),
            app_err.code(),
            app_err.message(),
            app_err.details().cloned(),
        ),
        Error::Http { status, message } => {
            let (message, details) = http_message_parts(*status, message);
            (*status, ErrorCode::from_status(*status), message, details)
        }
        Error::Unexpected(cause) => {
            error!(
                request_id = %request_id,
                path = %path,
                error = ?cause,
                "[ERROR] Unhandled error"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                format!("An unexpected error occurred. Reference: {request_id}"),
                None,
            )
        }
    };

    if status.is_server_error() {
        error!(
            request_id = %request_id,
            path = %path,
            status = status.as_u16(),
            code = %code,
            "[ERROR] {} {}",
            code,
            message
        );
    } else {
        warn!(
            request_id = %request_id,
            path = %path,
            status = status.as_u16(),
            code = %code,
            "[ERROR] {} {}",
            code,
            message
        );
    }

    Translation {
        status,
        envelope: ResponseEnvelope::failure(
            request_id,
            ErrorBody {
                code,
                message,
                details,
                path,
                timestamp,
            },
        ),
    }
}

fn http_message_parts(status: StatusCode, message: &HttpMessage) -> (String, Option<Value>) {
    match message {
        HttpMessage::Text(text) => (text.clone(), None),
        HttpMessage::List(errors) => (
            status.canonical_reason().unwrap_or("Request failed").to_string(),
            Some(json!({ "errors": errors })),
        ),
    }
}
