//! # Principal
//!
//! The authenticated identity attached to a request once a strategy succeeds.

use serde::Serialize;
use serde_json::{Map, Value};

/// How the principal was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Bearer,
    ApiKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub subject_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub auth_method: AuthMethod,
    /// Remaining claims (token claims, or key metadata).
    pub claims: Map<String, Value>,
}

impl Principal {
    /// Numeric user id, for bearer principals issued by this service.
    pub fn user_id(&self) -> Option<i64> {
        match self.auth_method {
            AuthMethod::Bearer => self.subject_id.parse().ok(),
            AuthMethod::ApiKey => None,
        }
    }
}
