//! # Contact Repository

use super::models::Contact;
use super::DbPool;
use crate::dto::{CreateContactRequest, PageQuery, UpdateContactRequest};
use sqlx::{query_as, query_scalar};

pub struct ContactRepository;

impl ContactRepository {
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Contact>, sqlx::Error> {
        query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &DbPool, page: &PageQuery) -> Result<(Vec<Contact>, u64), sqlx::Error> {
        let contacts = query_as::<_, Contact>("SELECT * FROM contacts ORDER BY id LIMIT ? OFFSET ?")
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(pool)
            .await?;

        let total: i64 = query_scalar("SELECT COUNT(*) FROM contacts").fetch_one(pool).await?;

        Ok((contacts, total as u64))
    }

    /// # Errors
    ///
    /// Unique-constraint database error when the email is taken.
    pub async fn create(pool: &DbPool, data: &CreateContactRequest) -> Result<Contact, sqlx::Error> {
        let address = data.address.as_ref();
        let result = sqlx::query(
            "INSERT INTO contacts (name, email, phone, street, city, country, project_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(data.name.trim())
        .bind(data.email.trim())
        .bind(data.phone.as_deref())
        .bind(address.and_then(|a| a.street.as_deref()))
        .bind(address.map(|a| a.city.as_str()))
        .bind(address.map(|a| a.country.as_str()))
        .bind(data.project_id)
        .execute(pool)
        .await?;

        query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
    }

    /// Apply the present fields. `None` when the contact does not exist.
    pub async fn update(
        pool: &DbPool,
        id: i64,
        data: &UpdateContactRequest,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let address = data.address.as_ref();
        let result = sqlx::query(
            "UPDATE contacts SET name = COALESCE(?, name), email = COALESCE(?, email), \
             phone = COALESCE(?, phone), street = COALESCE(?, street), city = COALESCE(?, city), \
             country = COALESCE(?, country), updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(data.name.as_deref().map(str::trim))
        .bind(data.email.as_deref().map(str::trim))
        .bind(data.phone.as_deref())
        .bind(address.and_then(|a| a.street.as_deref()))
        .bind(address.map(|a| a.city.as_str()))
        .bind(address.map(|a| a.country.as_str()))
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::AddressDto;
    use crate::model::store::memory_pool;

    #[tokio::test]
    async fn test_create_stores_flattened_address() {
        let pool = memory_pool().await.unwrap();
        let req = CreateContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            project_id: None,
            address: Some(AddressDto {
                street: Some("1 Rue de Rivoli".to_string()),
                city: "Paris".to_string(),
                country: "FR".to_string(),
            }),
        };

        let contact = ContactRepository::create(&pool, &req).await.unwrap();

        assert_eq!(contact.city.as_deref(), Some("Paris"));
        assert_eq!(contact.street.as_deref(), Some("1 Rue de Rivoli"));
        assert!(ContactRepository::find_by_id(&pool, contact.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let pool = memory_pool().await.unwrap();
        let req = CreateContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("+33 1".to_string()),
            project_id: None,
            address: None,
        };
        let contact = ContactRepository::create(&pool, &req).await.unwrap();

        let update = UpdateContactRequest {
            name: Some("Ada L.".to_string()),
            ..Default::default()
        };
        let updated = ContactRepository::update(&pool, contact.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.phone.as_deref(), Some("+33 1"));
    }
}
