//! # API Key Handlers
//!
//! Key management is reserved for bearer (signed-in user) callers. The
//! secret is only ever returned by `POST /api/api-keys`.

use crate::error::Result;
use crate::extractors::{Authenticated, ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use lib_auth::generate_api_key;
use lib_core::dto::{ApiKeyCreated, ApiKeyInfo, CreateApiKeyRequest};
use lib_core::model::store::ApiKeyRepository;
use lib_core::{AppError, DbPool};
use serde_json::{json, Value};
use tracing::info;

pub async fn create_api_key(
    State(pool): State<DbPool>,
    auth: Authenticated,
    ValidatedJson(req): ValidatedJson<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyCreated>)> {
    let owner_id = auth.user_id()?;
    let secret = generate_api_key();

    let key = ApiKeyRepository::create(&pool, &secret, req.description.as_deref(), Some(owner_id)).await?;

    info!(owner_id, key_id = key.id, "[API KEY] issued");
    Ok((StatusCode::CREATED, Json(key.into())))
}

pub async fn list_api_keys(State(pool): State<DbPool>, auth: Authenticated) -> Result<Json<Vec<ApiKeyInfo>>> {
    let owner_id = auth.user_id()?;
    let keys = ApiKeyRepository::list_for_owner(&pool, owner_id).await?;
    Ok(Json(keys.into_iter().map(ApiKeyInfo::from).collect()))
}

/// Deactivates the key; the record is kept.
pub async fn delete_api_key(
    State(pool): State<DbPool>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let owner_id = auth.user_id()?;

    if !ApiKeyRepository::deactivate(&pool, id, owner_id).await? {
        return Err(AppError::not_found("API key", id).into());
    }

    info!(owner_id, key_id = id, "[API KEY] revoked");
    Ok(Json(json!({ "id": id, "deleted": true })))
}
