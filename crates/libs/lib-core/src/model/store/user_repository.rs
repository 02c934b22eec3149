//! # User Repository
//!
//! Database access for user accounts.

use super::models::User;
use super::DbPool;
use crate::dto::PageQuery;
use sqlx::{query_as, query_scalar};

pub struct UserRepository;

impl UserRepository {
    /// Find a user by email address.
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a user. `password_hash` must already be hashed.
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint database error when the email is taken.
    pub async fn create(
        pool: &DbPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .execute(pool)
            .await?;

        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
    }

    /// One page of users ordered by id, plus the total count.
    pub async fn list(pool: &DbPool, page: &PageQuery) -> Result<(Vec<User>, u64), sqlx::Error> {
        let users = query_as::<_, User>("SELECT * FROM users ORDER BY id LIMIT ? OFFSET ?")
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(pool)
            .await?;

        let total: i64 = query_scalar("SELECT COUNT(*) FROM users").fetch_one(pool).await?;

        Ok((users, total as u64))
    }
}
