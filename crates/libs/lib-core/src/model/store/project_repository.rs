//! # Project Repository

use super::models::Project;
use super::DbPool;
use crate::dto::{CreateProjectRequest, PageQuery, UpdateProjectRequest};
use sqlx::{query_as, query_scalar};

pub struct ProjectRepository;

impl ProjectRepository {
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Project>, sqlx::Error> {
        query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &DbPool, page: &PageQuery) -> Result<(Vec<Project>, u64), sqlx::Error> {
        let projects = query_as::<_, Project>("SELECT * FROM projects ORDER BY id LIMIT ? OFFSET ?")
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(pool)
            .await?;

        let total: i64 = query_scalar("SELECT COUNT(*) FROM projects").fetch_one(pool).await?;

        Ok((projects, total as u64))
    }

    /// # Errors
    ///
    /// Unique-constraint database error when the name is taken.
    pub async fn create(
        pool: &DbPool,
        data: &CreateProjectRequest,
        owner_id: Option<i64>,
    ) -> Result<Project, sqlx::Error> {
        let result = sqlx::query("INSERT INTO projects (name, description, owner_id) VALUES (?, ?, ?)")
            .bind(data.name.trim())
            .bind(data.description.as_deref())
            .bind(owner_id)
            .execute(pool)
            .await?;

        query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
    }

    /// Apply the present fields. `None` when the project does not exist.
    pub async fn update(
        pool: &DbPool,
        id: i64,
        data: &UpdateProjectRequest,
    ) -> Result<Option<Project>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET name = COALESCE(?, name), description = COALESCE(?, description), \
             updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(data.name.as_deref().map(str::trim))
        .bind(data.description.as_deref())
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Returns `false` when nothing was deleted.
    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::memory_pool;

    fn new_project(name: &str) -> CreateProjectRequest {
        CreateProjectRequest {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let pool = memory_pool().await.unwrap();

        let created = ProjectRepository::create(&pool, &new_project("Apollo"), None).await.unwrap();
        assert_eq!(created.name, "Apollo");

        let update = UpdateProjectRequest {
            name: None,
            description: Some("moonshot".to_string()),
        };
        let updated = ProjectRepository::update(&pool, created.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.name, "Apollo");
        assert_eq!(updated.description.as_deref(), Some("moonshot"));

        assert!(ProjectRepository::delete(&pool, created.id).await.unwrap());
        assert!(!ProjectRepository::delete(&pool, created.id).await.unwrap());
        assert!(ProjectRepository::find_by_id(&pool, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_none() {
        let pool = memory_pool().await.unwrap();
        let result = ProjectRepository::update(&pool, 42, &UpdateProjectRequest::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_counts_all_rows() {
        let pool = memory_pool().await.unwrap();
        for i in 0..45 {
            ProjectRepository::create(&pool, &new_project(&format!("p{i}")), None).await.unwrap();
        }

        let (items, total) = ProjectRepository::list(&pool, &PageQuery { page: Some(5), limit: Some(10) })
            .await
            .unwrap();

        assert_eq!(total, 45);
        assert_eq!(items.len(), 5);
    }
}
