use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::base::Model;
use crate::db::filter::SqlValue;
use crate::models::Timestamps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Professional,
    Consumer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Professional => "professional",
            Role::Consumer => "consumer",
        }
    }
}

impl From<Role> for SqlValue {
    fn from(role: Role) -> Self {
        SqlValue::Enum {
            type_name: "role",
            value: role.as_str(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_active: bool,
    pub role: Option<Role>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Model for User {
    const TABLE: &'static str = "users";
    const NAME: &'static str = "User";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "email",
        "password",
        "is_active",
        "role",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> i32 {
        self.id
    }
}
