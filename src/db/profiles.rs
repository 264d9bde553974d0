use sqlx::PgConnection;

use crate::db::{CrudBase, Page, SqlValue};
use crate::error::AppError;
use crate::models::Profile;
use crate::schemas::profiles::{ProfileCreate, ProfileUpdate};

pub type ProfileCrud = CrudBase<Profile, ProfileCreate, ProfileUpdate>;

pub const PROFILES: ProfileCrud = CrudBase::new();

impl ProfileCrud {
    /// The profile owned by `user_id`. Several rows may reference the same
    /// user; the oldest one wins.
    pub async fn for_user(
        &self,
        conn: &mut PgConnection,
        user_id: i32,
    ) -> Result<Option<Profile>, AppError> {
        let criteria = [("user_id", SqlValue::from(user_id))];
        let found = self
            .filter_by(conn, Page::default(), false, &criteria)
            .await?;
        Ok(found.into_one())
    }
}
