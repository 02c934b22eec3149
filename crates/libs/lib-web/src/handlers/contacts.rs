use crate::error::Result;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use lib_core::dto::{CreateContactRequest, Page, PageQuery, UpdateContactRequest};
use lib_core::model::store::models::Contact;
use lib_core::model::store::{ContactRepository, ProjectRepository};
use lib_core::{AppError, DbPool};
use serde_json::{json, Value};

pub async fn list_contacts(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<Contact>>> {
    let (items, total) = ContactRepository::list(&pool, &query).await?;
    Ok(Json(Page::new(items, &query, total)))
}

pub async fn get_contact(State(pool): State<DbPool>, Path(id): Path<i64>) -> Result<Json<Contact>> {
    ContactRepository::find_by_id(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Contact", id).into())
}

async fn ensure_project_exists(pool: &DbPool, project_id: Option<i64>) -> Result<()> {
    if let Some(project_id) = project_id {
        if ProjectRepository::find_by_id(pool, project_id).await?.is_none() {
            return Err(AppError::not_found("Project", project_id).into());
        }
    }
    Ok(())
}

pub async fn create_contact(
    State(pool): State<DbPool>,
    ValidatedJson(req): ValidatedJson<CreateContactRequest>,
) -> Result<(StatusCode, Json<Contact>)> {
    ensure_project_exists(&pool, req.project_id).await?;
    let contact = ContactRepository::create(&pool, &req).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn update_contact(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateContactRequest>,
) -> Result<Json<Contact>> {
    ContactRepository::update(&pool, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Contact", id).into())
}

pub async fn delete_contact(State(pool): State<DbPool>, Path(id): Path<i64>) -> Result<Json<Value>> {
    if !ContactRepository::delete(&pool, id).await? {
        return Err(AppError::not_found("Contact", id).into());
    }
    Ok(Json(json!({ "id": id, "deleted": true })))
}
