use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::{CreateSchema, Fields, SqlValue, UpdateSchema};
use crate::error::AppError;
use crate::models::Profile;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProfileCreate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub user_id: i32,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        ProfileResponse {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            user_id: p.user_id,
            created_at: p.timestamps.created_at,
            updated_at: p.timestamps.updated_at,
        }
    }
}

impl CreateSchema for ProfileCreate {
    fn into_values(self) -> Result<Fields, AppError> {
        Ok(vec![
            ("first_name", SqlValue::from(self.first_name)),
            ("last_name", SqlValue::from(self.last_name)),
            ("user_id", SqlValue::from(self.user_id)),
        ])
    }
}

impl UpdateSchema for ProfileUpdate {
    fn into_changes(self) -> Result<Fields, AppError> {
        let mut changes = Fields::new();
        if let Some(first_name) = self.first_name {
            changes.push(("first_name", SqlValue::from(first_name)));
        }
        if let Some(last_name) = self.last_name {
            changes.push(("last_name", SqlValue::from(last_name)));
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_must_not_be_empty() {
        let payload = ProfileCreate {
            first_name: String::new(),
            last_name: "Lucyk".into(),
            user_id: 1,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_skips_missing_names() {
        let update = ProfileUpdate {
            last_name: Some("Smith".into()),
            ..Default::default()
        };
        assert_eq!(
            update.into_changes().unwrap(),
            vec![("last_name", SqlValue::from("Smith"))]
        );
    }
}
