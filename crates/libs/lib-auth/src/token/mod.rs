//! # JWT Token Management
//!
//! HS256 bearer tokens signed with the shared secret. Claims carry the
//! subject, an optional email and any extra application claims.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// JWT claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Any other claims present in the token.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, email: Option<String>, expiration_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            email,
            exp: (now + Duration::hours(expiration_hours)).timestamp(),
            iat: now.timestamp(),
            extra: Map::new(),
        }
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("token expired")]
    Expired,
    #[error("token signature invalid")]
    BadSignature,
    #[error("token malformed: {0}")]
    Malformed(String),
    #[error("failed to encode token: {0}")]
    Encode(String),
}

/// Encode a JWT for a subject.
pub fn encode_jwt(
    sub: impl Into<String>,
    email: Option<String>,
    secret: &str,
    expiration_hours: i64,
) -> Result<String, Error> {
    encode_claims(&Claims::new(sub, email, expiration_hours), secret)
}

/// Encode prepared claims.
pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String, Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Encode(e.to_string()))
}

/// Decode and validate a JWT (signature and expiry).
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => Error::Expired,
        ErrorKind::InvalidSignature => Error::BadSignature,
        _ => Error::Malformed(e.to_string()),
    })?;

    Ok(token_data.claims)
}
