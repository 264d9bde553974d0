use sqlx::PgConnection;

use crate::db::{CrudBase, Page, SqlValue};
use crate::error::AppError;
use crate::models::User;
use crate::schemas::users::{normalize_email, UserCreate, UserUpdate};

pub type UserCrud = CrudBase<User, UserCreate, UserUpdate>;

pub const USERS: UserCrud = CrudBase::new();

impl UserCrud {
    pub async fn find_by_email(
        &self,
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let criteria = [("email", SqlValue::from(normalize_email(email)))];
        let found = self
            .filter_by(conn, Page::default(), false, &criteria)
            .await?;
        Ok(found.into_one())
    }
}
