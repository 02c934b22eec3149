use crate::error::Result;
use crate::extractors::{Authenticated, ValidatedJson, ValidatedQuery};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use lib_core::dto::{CreateProjectRequest, Page, PageQuery, UpdateProjectRequest};
use lib_core::model::store::models::Project;
use lib_core::model::store::ProjectRepository;
use lib_core::{AppError, DbPool};
use serde_json::{json, Value};

pub async fn list_projects(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<Project>>> {
    let (items, total) = ProjectRepository::list(&pool, &query).await?;
    Ok(Json(Page::new(items, &query, total)))
}

pub async fn get_project(State(pool): State<DbPool>, Path(id): Path<i64>) -> Result<Json<Project>> {
    ProjectRepository::find_by_id(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Project", id).into())
}

/// The creator becomes the owner when signed in with a bearer token.
pub async fn create_project(
    State(pool): State<DbPool>,
    Authenticated(principal): Authenticated,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>)> {
    let project = ProjectRepository::create(&pool, &req, principal.user_id()).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> Result<Json<Project>> {
    ProjectRepository::update(&pool, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Project", id).into())
}

pub async fn delete_project(State(pool): State<DbPool>, Path(id): Path<i64>) -> Result<Json<Value>> {
    if !ProjectRepository::delete(&pool, id).await? {
        return Err(AppError::not_found("Project", id).into());
    }
    Ok(Json(json!({ "id": id, "deleted": true })))
}
