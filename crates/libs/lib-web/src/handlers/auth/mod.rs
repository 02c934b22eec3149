//! # Authentication Handlers
//!
//! - `POST /api/auth/register`: create an account (public)
//! - `POST /api/auth/login`: exchange email and password for a bearer token (public)
//! - `GET  /api/auth/me`: the authenticated principal
//!
//! Login failures never say which half of the credentials was wrong.

use crate::error::{Error, Result};
use crate::extractors::{Authenticated, ValidatedJson};
use axum::{extract::State, http::StatusCode, Json};
use lib_auth::{encode_jwt, hash_password, verify_password};
use lib_core::dto::{LoginRequest, RegisterRequest, TokenResponse, UserInfo};
use lib_core::model::store::UserRepository;
use lib_core::{AppError, Config, DbPool, Principal};
use tracing::{info, instrument, warn};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[instrument(skip_all)]
pub async fn register(
    State(pool): State<DbPool>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserInfo>)> {
    let email = req.email.trim().to_lowercase();

    if UserRepository::find_by_email(&pool, &email).await?.is_some() {
        warn!("[REGISTER] email already registered");
        return Err(AppError::Conflict("Email already registered".to_string()).into());
    }

    let password_hash = hash_password(&req.password).map_err(|e| Error::Unexpected(anyhow::anyhow!(e)))?;
    let user = UserRepository::create(&pool, req.name.trim(), &email, &password_hash).await?;

    info!(user_id = user.id, "[REGISTER] user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip_all)]
pub async fn login(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let invalid = || Error::from(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    let email = req.email.trim().to_lowercase();

    let user = UserRepository::find_by_email(&pool, &email).await?.ok_or_else(invalid)?;

    if !user.is_active || !verify_password(&req.password, &user.password_hash) {
        warn!(user_id = user.id, "[LOGIN] rejected");
        return Err(invalid());
    }

    let access_token = encode_jwt(
        user.id.to_string(),
        Some(user.email.clone()),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )
    .map_err(|e| Error::Unexpected(anyhow::Error::new(e).context("issuing access token")))?;

    info!(user_id = user.id, "[LOGIN] token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: config.jwt_expiration_hours * 3600,
        user: user.into(),
    }))
}

pub async fn me(Authenticated(principal): Authenticated) -> Json<Principal> {
    Json(principal)
}
