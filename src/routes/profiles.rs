use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::profiles::PROFILES;
use crate::db::users::USERS;
use crate::db::{Criterion, DbSession, Filter, Page, SqlValue};
use crate::error::AppError;
use crate::routes::extract::{Path, Query, ValidatedJson};
use crate::schemas::{ProfileCreate, ProfileResponse, ProfileUpdate};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileListParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    /// Case-insensitive substring of the first or last name.
    pub name: Option<String>,
}

/// Escape `LIKE` metacharacters so `name` is matched literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[utoipa::path(
    get,
    path = "/profiles/",
    tag = "profiles",
    params(ProfileListParams),
    responses((status = 200, description = "Profiles in id order", body = [ProfileResponse]))
)]
pub async fn list(
    mut db: DbSession,
    Query(params): Query<ProfileListParams>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let page = Page::from_query(params.skip, params.limit);

    let profiles = match params.name.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            let pattern = like_pattern(term);
            let filters = [
                Filter::ilike("first_name", pattern.clone()),
                Filter::ilike("last_name", pattern),
            ];
            PROFILES
                .filter(&mut db, &filters, Criterion::Or, page, true)
                .await?
                .into_many()
        }
        _ => PROFILES.get_multi(&mut db, page).await?,
    };

    Ok(Json(profiles.into_iter().map(ProfileResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/profiles/",
    tag = "profiles",
    request_body = ProfileCreate,
    responses(
        (status = 200, description = "Profile created", body = ProfileResponse),
        (status = 404, description = "Owning user does not exist"),
        (status = 422, description = "Invalid payload"),
    )
)]
pub async fn create(
    mut db: DbSession,
    ValidatedJson(req): ValidatedJson<ProfileCreate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let owner = [("id", SqlValue::from(req.user_id))];
    if !USERS.exists(&mut db, &owner).await? {
        return Err(AppError::NotFound(format!(
            "User with id {} does not exist",
            req.user_id
        )));
    }

    let profile = PROFILES.create(&mut db, req).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    get,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = i32, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "No such profile"),
    )
)]
pub async fn get(
    mut db: DbSession,
    Path(id): Path<i32>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = PROFILES.get_or_404(&mut db, id).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    patch,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = i32, Path, description = "Profile id")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 404, description = "No such profile"),
    )
)]
pub async fn update(
    mut db: DbSession,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = PROFILES.get_or_404(&mut db, id).await?;
    let profile = PROFILES.update(&mut db, &profile, req).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    delete,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = i32, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Deleted profile", body = ProfileResponse),
        (status = 404, description = "No such profile"),
    )
)]
pub async fn delete(
    mut db: DbSession,
    Path(id): Path<i32>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = PROFILES.delete(&mut db, id).await?;
    Ok(Json(profile.into()))
}
