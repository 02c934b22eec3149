//! # Response Envelope
//!
//! Every HTTP response body is exactly one of two shapes:
//!
//! ```text
//! { "status": "success", "request_id": "req_...", "data": <any>,
//!   "meta"?: { "pagination": { "page", "limit", "total_items", "total_pages" } } }
//!
//! { "status": "error", "request_id": "req_...",
//!   "error": { "code", "message", "details"?, "path", "timestamp" } }
//! ```
//!
//! `meta` only appears for paginated collections.

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseEnvelope {
    Success {
        request_id: String,
        data: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<ResponseMeta>,
    },
    Error {
        request_id: String,
        error: ErrorBody,
    },
}

impl ResponseEnvelope {
    pub fn success(request_id: impl Into<String>, data: Value) -> Self {
        ResponseEnvelope::Success {
            request_id: request_id.into(),
            data,
            meta: None,
        }
    }

    pub fn paginated(request_id: impl Into<String>, items: Vec<Value>, pagination: PaginationMeta) -> Self {
        ResponseEnvelope::Success {
            request_id: request_id.into(),
            data: Value::Array(items),
            meta: Some(ResponseMeta { pagination }),
        }
    }

    pub fn failure(request_id: impl Into<String>, error: ErrorBody) -> Self {
        ResponseEnvelope::Error {
            request_id: request_id.into(),
            error,
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            ResponseEnvelope::Success { request_id, .. } | ResponseEnvelope::Error { request_id, .. } => {
                request_id
            }
        }
    }

    /// Whether a JSON value already has an envelope shape (`status` of
    /// `"success"` or `"error"`).
    pub fn is_envelope(value: &Value) -> bool {
        matches!(
            value.get("status").and_then(Value::as_str),
            Some(STATUS_SUCCESS) | Some(STATUS_ERROR)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub path: String,
    /// ISO 8601
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    /// `limit` is clamped to at least 1; `total_pages = ceil(total_items / limit)`.
    pub fn new(page: u64, limit: u64, total_items: u64) -> Self {
        let limit = limit.max(1);
        Self {
            page,
            limit,
            total_items,
            total_pages: total_items.div_ceil(limit),
        }
    }
}
