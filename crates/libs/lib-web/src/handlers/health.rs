use axum::Json;
use lib_utils::now_utc_str;
use serde_json::{json, Value};

/// `GET /health` (public)
pub async fn health() -> Json<Value> {
    Json(json!({ "healthy": true, "checked_at": now_utc_str() }))
}
