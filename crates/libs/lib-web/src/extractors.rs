//! # Extractors
//!
//! - [`Authenticated`]: the [`Principal`] the auth middleware attached.
//! - [`ValidatedJson`] / [`ValidatedQuery`]: deserialize, then run the
//!   type's [`Validate`] rules. Violations come back as one
//!   `VALIDATION_ERROR` whose `details` is the flattened field map.

use crate::error::Error;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use lib_core::{AppError, Principal, Validate};
use serde::de::DeserializeOwned;

/// Authenticated caller. Rejects with `AUTHENTICATION_ERROR` when no
/// principal is attached (the route skipped the auth middleware).
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| AppError::Authentication("Authentication required".to_string()).into())
    }
}

impl Authenticated {
    /// Numeric id of the signed-in user. API key callers are refused.
    pub fn user_id(&self) -> Result<i64, Error> {
        self.0
            .user_id()
            .ok_or_else(|| AppError::Authorization("This action requires a signed-in user".to_string()).into())
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.ensure_valid()?;
        Ok(ValidatedJson(value))
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.ensure_valid()?;
        Ok(ValidatedQuery(value))
    }
}
