//! # Domain Errors
//!
//! The closed error taxonomy shared by every endpoint.
//!
//! [`ErrorCode`] names the category and fixes its HTTP status. [`AppError`]
//! is the typed failure raised close to where a problem is detected (not
//! found, conflict, invalid input, ...). It carries a client-safe message
//! and optional structured details, and it propagates unmodified up to the
//! web layer, which serializes it into the error envelope.
//!
//! | Code                    | Status |
//! |-------------------------|--------|
//! | `VALIDATION_ERROR`      | 422    |
//! | `AUTHENTICATION_ERROR`  | 401    |
//! | `AUTHORIZATION_ERROR`   | 403    |
//! | `RESOURCE_NOT_FOUND`    | 404    |
//! | `CONFLICT_ERROR`        | 409    |
//! | `RATE_LIMIT_ERROR`      | 429    |
//! | `INTERNAL_SERVER_ERROR` | 500    |

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Error category reported in `error.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    AuthenticationError,
    AuthorizationError,
    ResourceNotFound,
    ConflictError,
    RateLimitError,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::AuthenticationError => "AUTHENTICATION_ERROR",
            ErrorCode::AuthorizationError => "AUTHORIZATION_ERROR",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::ConflictError => "CONFLICT_ERROR",
            ErrorCode::RateLimitError => "RATE_LIMIT_ERROR",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// The fixed HTTP status for this category.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::AuthenticationError => StatusCode::UNAUTHORIZED,
            ErrorCode::AuthorizationError => StatusCode::FORBIDDEN,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ConflictError => StatusCode::CONFLICT,
            ErrorCode::RateLimitError => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a bare HTTP status. Anything unmapped is an internal error.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 | 422 => ErrorCode::ValidationError,
            401 => ErrorCode::AuthenticationError,
            403 => ErrorCode::AuthorizationError,
            404 => ErrorCode::ResourceNotFound,
            409 => ErrorCode::ConflictError,
            429 => ErrorCode::RateLimitError,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed domain failure. Messages are shown to clients as-is.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure carrying a flattened `field -> message` map.
    pub fn validation(fields: BTreeMap<String, String>) -> Self {
        let details = fields
            .into_iter()
            .map(|(field, message)| (field, Value::String(message)))
            .collect::<serde_json::Map<_, _>>();

        AppError::Validation {
            message: "Validation failed".to_string(),
            details: Some(Value::Object(details)),
        }
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        AppError::NotFound(format!("{resource} with id {id} not found"))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::Authentication(_) => ErrorCode::AuthenticationError,
            AppError::Authorization(_) => ErrorCode::AuthorizationError,
            AppError::NotFound(_) => ErrorCode::ResourceNotFound,
            AppError::Conflict(_) => ErrorCode::ConflictError,
            AppError::RateLimited(_) => ErrorCode::RateLimitError,
            AppError::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.code().status()
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            AppError::Validation { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        let cases = [
            (400, ErrorCode::ValidationError),
            (422, ErrorCode::ValidationError),
            (401, ErrorCode::AuthenticationError),
            (403, ErrorCode::AuthorizationError),
            (404, ErrorCode::ResourceNotFound),
            (409, ErrorCode::ConflictError),
            (429, ErrorCode::RateLimitError),
            (418, ErrorCode::InternalServerError),
            (500, ErrorCode::InternalServerError),
            (503, ErrorCode::InternalServerError),
        ];
        for (status, code) in cases {
            let status = StatusCode::from_u16(status).unwrap();
            assert_eq!(ErrorCode::from_status(status), code, "status {status}");
        }
    }

    #[test]
    fn test_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::ResourceNotFound).unwrap();
        assert_eq!(json, "\"RESOURCE_NOT_FOUND\"");
        assert_eq!(ErrorCode::RateLimitError.to_string(), "RATE_LIMIT_ERROR");
    }

    #[test]
    fn test_every_code_round_trips_through_its_status() {
        // VALIDATION_ERROR maps through 422, the rest map 1:1.
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::AuthenticationError,
            ErrorCode::AuthorizationError,
            ErrorCode::ResourceNotFound,
            ErrorCode::ConflictError,
            ErrorCode::RateLimitError,
            ErrorCode::InternalServerError,
        ] {
            assert_eq!(ErrorCode::from_status(code.status()), code);
        }
    }

    #[test]
    fn test_validation_details_shape() {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), "bad email".to_string());
        let err = AppError::validation(fields);

        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details(), Some(&serde_json::json!({ "email": "bad email" })));
    }
}
