//! # API Key Repository
//!
//! Storage for opaque API keys, and the [`CredentialStore`] the API key
//! authentication strategy consults.

use super::models::ApiKey;
use super::DbPool;
use crate::credential::CredentialStore;
use crate::error::{self, AppError};
use crate::principal::{AuthMethod, Principal};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::{Map, Value};
use sqlx::query_as;

pub struct ApiKeyRepository;

impl ApiKeyRepository {
    pub async fn create(
        pool: &DbPool,
        secret: &str,
        description: Option<&str>,
        owner_id: Option<i64>,
    ) -> Result<ApiKey, sqlx::Error> {
        let result = sqlx::query("INSERT INTO api_keys (secret, description, owner_id) VALUES (?, ?, ?)")
            .bind(secret)
            .bind(description)
            .bind(owner_id)
            .execute(pool)
            .await?;

        query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_secret(pool: &DbPool, secret: &str) -> Result<Option<ApiKey>, sqlx::Error> {
        query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE secret = ?")
            .bind(secret)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_owner(pool: &DbPool, owner_id: i64) -> Result<Vec<ApiKey>, sqlx::Error> {
        query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE owner_id = ? ORDER BY id")
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a key inactive. Returns `false` when no key matched.
    pub async fn deactivate(pool: &DbPool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE api_keys SET is_active = 0, updated_at = CURRENT_TIMESTAMP WHERE id = ? AND owner_id = ?",
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// [`CredentialStore`] backed by the `api_keys` table.
#[derive(Clone)]
pub struct SqlCredentialStore {
    pool: DbPool,
}

impl SqlCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn active_key(&self, secret: &str) -> error::Result<Option<ApiKey>> {
        let key = ApiKeyRepository::find_by_secret(&self.pool, secret)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "[CREDENTIALS] lookup failed");
                AppError::Internal(format!("credential lookup failed: {e}"))
            })?;
        Ok(key.filter(|k| k.is_active))
    }
}

impl CredentialStore for SqlCredentialStore {
    fn validate<'a>(&'a self, secret: &'a str) -> BoxFuture<'a, error::Result<bool>> {
        async move { Ok(self.active_key(secret).await?.is_some()) }.boxed()
    }

    fn resolve<'a>(&'a self, secret: &'a str) -> BoxFuture<'a, error::Result<Option<Principal>>> {
        async move {
            Ok(self.active_key(secret).await?.map(|key| {
                let mut claims = Map::new();
                claims.insert("api_key_id".to_string(), Value::from(key.id));
                if let Some(owner_id) = key.owner_id {
                    claims.insert("owner_id".to_string(), Value::from(owner_id));
                }
                if let Some(description) = key.description {
                    claims.insert("description".to_string(), Value::from(description));
                }
                Principal {
                    subject_id: format!("api-key:{}", key.id),
                    email: None,
                    auth_method: AuthMethod::ApiKey,
                    claims,
                }
            }))
        }
        .boxed()
    }
}
