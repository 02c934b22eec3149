use crate::error::Result;
use crate::extractors::ValidatedQuery;
use axum::{
    extract::{Path, State},
    Json,
};
use lib_core::dto::{Page, PageQuery, UserInfo};
use lib_core::model::store::UserRepository;
use lib_core::{AppError, DbPool};

pub async fn list_users(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<UserInfo>>> {
    let (users, total) = UserRepository::list(&pool, &query).await?;
    let items = users.into_iter().map(UserInfo::from).collect();
    Ok(Json(Page::new(items, &query, total)))
}

pub async fn get_user(State(pool): State<DbPool>, Path(id): Path<i64>) -> Result<Json<UserInfo>> {
    UserRepository::find_by_id(&pool, id)
        .await?
        .map(|user| Json(user.into()))
        .ok_or_else(|| AppError::not_found("User", id).into())
}
