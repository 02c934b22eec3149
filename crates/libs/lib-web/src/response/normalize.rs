//! # Response Normalizer
//!
//! Decides how a successful handler's JSON output is enveloped:
//!
//! 1. already an envelope (`status` is `"success"` or `"error"`): passed
//!    through, only a missing `request_id` is filled in;
//! 2. a paginated result (see [`Page::detect`]): items become `data`, the
//!    counters become `meta.pagination`;
//! 3. anything else: becomes `data` of a success envelope without `meta`.

use lib_core::dto::{Page, ResponseEnvelope};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    Passthrough(Value),
    Wrapped(ResponseEnvelope),
}

impl Normalized {
    pub fn into_value(self) -> Value {
        match self {
            Normalized::Passthrough(value) => value,
            Normalized::Wrapped(envelope) => serde_json::to_value(envelope).unwrap_or(Value::Null),
        }
    }
}

pub fn normalize(value: Value, request_id: &str) -> Normalized {
    if ResponseEnvelope::is_envelope(&value) {
        debug!(request_id = %request_id, "[RESPONSE MAP] passthrough (already enveloped)");
        return Normalized::Passthrough(stamp_request_id(value, request_id));
    }

    if let Some(page) = Page::detect(&value) {
        let meta = page.meta();
        debug!(
            request_id = %request_id,
            page = meta.page,
            limit = meta.limit,
            total_items = meta.total_items,
            "[RESPONSE MAP] paginated"
        );
        return Normalized::Wrapped(ResponseEnvelope::paginated(request_id, page.items, meta));
    }

    debug!(request_id = %request_id, "[RESPONSE MAP] wrapped");
    Normalized::Wrapped(ResponseEnvelope::success(request_id, value))
}

fn stamp_request_id(mut value: Value, request_id: &str) -> Value {
    if let Value::Object(obj) = &mut value {
        let missing = match obj.get("request_id") {
            None | Some(Value::Null) => true,
            Some(Value::String(id)) => id.is_empty(),
            Some(_) => false,
        };
        if missing {
            obj.insert("request_id".to_string(), Value::String(request_id.to_string()));
        }
    }
    value
}
