//! # API Key DTOs
//!
//! The secret is returned once, in [`ApiKeyCreated`]. Listings use [`ApiKeyInfo`].

use crate::model::store::models::ApiKey;
use crate::validation::{FieldViolation, Validate, ViolationTree};
use chrono::{DateTime, Utc};
use lib_utils::validate_length;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateApiKeyRequest {
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for CreateApiKeyRequest {
    fn validate(&self) -> Vec<FieldViolation> {
        let description = self.description.as_deref().unwrap_or_default();
        ViolationTree::new()
            .check("description", [validate_length(description, 0, 255, "description")])
            .into_violations()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyCreated {
    pub id: i64,
    pub key: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyCreated {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            key: key.secret,
            description: key.description,
            created_at: key.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    pub id: i64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyInfo {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            description: key.description,
            is_active: key.is_active,
            created_at: key.created_at,
            updated_at: key.updated_at,
        }
    }
}
