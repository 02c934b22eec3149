//! # Web Errors
//!
//! Everything a handler, extractor or middleware can fail with, split by
//! how it must be reported:
//!
//! - [`Error::Domain`]: a typed [`AppError`]; code, status, message and
//!   details are reported verbatim.
//! - [`Error::Http`]: a bare HTTP failure (framework rejections, untyped
//!   error responses); the code is derived from the status.
//! - [`Error::Unexpected`]: anything else. Logged in full, reported to the
//!   client only as a generic internal error.
//!
//! `IntoResponse` does not write a body. It stores the error in the
//! response extensions and the response-map middleware serializes it,
//! so the error envelope is produced in exactly one place.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lib_core::AppError;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] AppError),

    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: HttpMessage },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Message of a bare HTTP failure: one line, or a list of sub-errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMessage {
    Text(String),
    List(Vec<String>),
}

impl std::fmt::Display for HttpMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMessage::Text(text) => f.write_str(text),
            HttpMessage::List(items) => f.write_str(&items.join("; ")),
        }
    }
}

impl HttpMessage {
    /// Interpret an error response body.
    ///
    /// JSON `{"message": "..."}` or `{"message": [..]}` and bare JSON string
    /// arrays are understood; anything else is taken as text.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        if let Ok(value) = serde_json::from_slice::<Value>(body) {
            let candidate = match &value {
                Value::Object(obj) => obj.get("message").cloned(),
                other => Some(other.clone()),
            };
            match candidate {
                Some(Value::String(text)) if !text.trim().is_empty() => {
                    return Some(HttpMessage::Text(text));
                }
                Some(Value::Array(items)) => {
                    let list: Vec<String> = items
                        .into_iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect();
                    if !list.is_empty() {
                        return Some(HttpMessage::List(list));
                    }
                }
                _ => {}
            }
        }

        let text = String::from_utf8_lossy(body).trim().to_string();
        (!text.is_empty()).then_some(HttpMessage::Text(text))
    }
}

impl Error {
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Http {
            status,
            message: HttpMessage::Text(message.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Domain(err) => err.status_code(),
            Error::Http { status, .. } => *status,
            Error::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()).into(),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Resource already exists".to_string()).into()
            }
            other => Error::Unexpected(anyhow::Error::new(other).context("database operation failed")),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::http(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::http(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::http(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let mut res = self.status().into_response();
        res.extensions_mut().insert(Arc::new(self));
        res
    }
}
