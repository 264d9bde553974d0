use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::password;
use crate::db::{CreateSchema, Fields, SqlValue, UpdateSchema};
use crate::error::AppError;
use crate::models::{Role, User};
use crate::schemas::nullable;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserCreate {
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: String,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UserUpdate {
    #[validate(email(message = "value is not a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: Option<String>,
    pub is_active: Option<bool>,
    /// Absent leaves the role alone, `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Role>)]
    pub role: Option<Option<Role>>,
}

/// A user as returned by the API. The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            email: u.email,
            is_active: u.is_active,
            role: u.role,
            created_at: u.timestamps.created_at,
            updated_at: u.timestamps.updated_at,
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(plain: &str) -> Result<String, AppError> {
    password::hash(plain).map_err(AppError::Internal)
}

impl CreateSchema for UserCreate {
    fn into_values(self) -> Result<Fields, AppError> {
        let mut values: Fields = vec![
            ("email", SqlValue::from(normalize_email(&self.email))),
            ("password", SqlValue::from(hash_password(&self.password)?)),
        ];
        if let Some(is_active) = self.is_active {
            values.push(("is_active", SqlValue::from(is_active)));
        }
        if let Some(role) = self.role {
            values.push(("role", SqlValue::from(role)));
        }
        Ok(values)
    }
}

impl UpdateSchema for UserUpdate {
    fn into_changes(self) -> Result<Fields, AppError> {
        let mut changes = Fields::new();
        if let Some(email) = self.email {
            changes.push(("email", SqlValue::from(normalize_email(&email))));
        }
        if let Some(plain) = self.password {
            changes.push(("password", SqlValue::from(hash_password(&plain)?)));
        }
        if let Some(is_active) = self.is_active {
            changes.push(("is_active", SqlValue::from(is_active)));
        }
        if let Some(role) = self.role {
            changes.push(("role", SqlValue::from(role)));
        }
        Ok(changes)
    }
}
