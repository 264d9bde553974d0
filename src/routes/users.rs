use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::profiles::PROFILES;
use crate::db::users::USERS;
use crate::db::{DbSession, Page, SqlValue};
use crate::error::AppError;
use crate::models::Role;
use crate::routes::extract::{Path, Query, ValidatedJson};
use crate::schemas::{ProfileResponse, UserCreate, UserResponse, UserUpdate};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListParams {
    /// Rows to skip.
    pub skip: Option<u32>,
    /// Maximum rows to return (default 100).
    pub limit: Option<u32>,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
}

#[utoipa::path(
    get,
    path = "/users/",
    tag = "users",
    params(UserListParams),
    responses((status = 200, description = "Users in id order", body = [UserResponse]))
)]
pub async fn list(
    mut db: DbSession,
    Query(params): Query<UserListParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let page = Page::from_query(params.skip, params.limit);

    let mut criteria: Vec<(&str, SqlValue)> = Vec::new();
    if let Some(is_active) = params.is_active {
        criteria.push(("is_active", SqlValue::from(is_active)));
    }
    if let Some(role) = params.role {
        criteria.push(("role", SqlValue::from(role)));
    }

    let users = if criteria.is_empty() {
        USERS.get_multi(&mut db, page).await?
    } else {
        USERS
            .filter_by(&mut db, page, true, &criteria)
            .await?
            .into_many()
    };

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    request_body = UserCreate,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Invalid payload"),
    )
)]
pub async fn create(
    mut db: DbSession,
    ValidatedJson(req): ValidatedJson<UserCreate>,
) -> Result<Json<UserResponse>, AppError> {
    let user = USERS.create(&mut db, req).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get(mut db: DbSession, Path(id): Path<i32>) -> Result<Json<UserResponse>, AppError> {
    let user = USERS.get_or_404(&mut db, id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "No such user"),
        (status = 400, description = "Email already registered"),
    )
)]
pub async fn update(
    mut db: DbSession,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UserUpdate>,
) -> Result<Json<UserResponse>, AppError> {
    let user = USERS.get_or_404(&mut db, id).await?;
    let user = USERS.update(&mut db, &user, req).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted user", body = UserResponse),
        (status = 404, description = "No such user"),
    )
)]
pub async fn delete(
    mut db: DbSession,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = USERS.delete(&mut db, id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/users/{id}/profile",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user's profile", body = ProfileResponse),
        (status = 404, description = "No such user, or the user has no profile"),
    )
)]
pub async fn profile(
    mut db: DbSession,
    Path(id): Path<i32>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = USERS.get_or_404(&mut db, id).await?;
    let profile = PROFILES
        .for_user(&mut db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} has no profile")))?;
    Ok(Json(profile.into()))
}
