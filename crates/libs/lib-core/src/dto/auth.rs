//! # Authentication DTOs
//!
//! - `POST /api/auth/register` - [`RegisterRequest`] -> [`UserInfo`]
//! - `POST /api/auth/login` - [`LoginRequest`] -> [`TokenResponse`]
//! - `GET  /api/auth/me` - `Principal`
//! - `GET  /api/users`, `GET /api/users/{id}` - [`UserInfo`]

use crate::model::store::models::User;
use crate::validation::{FieldViolation, Validate, ViolationTree};
use chrono::{DateTime, Utc};
use lib_utils::{validate_email, validate_length, validate_not_empty};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Vec<FieldViolation> {
        ViolationTree::new()
            .check("email", [validate_not_empty(&self.email, "email"), validate_email(&self.email)])
            .check("password", [validate_not_empty(&self.password, "password")])
            .into_violations()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Vec<FieldViolation> {
        ViolationTree::new()
            .check("name", [validate_not_empty(&self.name, "name"), validate_length(&self.name, 2, 100, "name")])
            .check("email", [validate_not_empty(&self.email, "email"), validate_email(&self.email)])
            .check("password", [validate_length(&self.password, 8, 128, "password")])
            .into_violations()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}
