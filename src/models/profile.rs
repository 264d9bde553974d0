use serde::Serialize;

use crate::db::base::Model;
use crate::models::Timestamps;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Profile {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub user_id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Model for Profile {
    const TABLE: &'static str = "profiles";
    const NAME: &'static str = "Profile";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "user_id",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> i32 {
        self.id
    }
}
