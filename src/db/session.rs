use std::ops::{Deref, DerefMut};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};

use crate::error::AppError;
use crate::state::SharedState;

/// One pooled connection per request.
///
/// Statements run in autocommit mode, so every CRUD call is its own
/// transaction. The connection goes back to the pool when the extractor is
/// dropped, whether the handler succeeded or not.
pub struct DbSession(pub PoolConnection<Postgres>);

impl Deref for DbSession {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

impl FromRequestParts<SharedState> for DbSession {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let conn = state.pool.acquire().await.map_err(|e| match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                AppError::Unavailable(format!("Could not acquire a database session: {e}"))
            }
            other => AppError::Database(other),
        })?;
        Ok(DbSession(conn))
    }
}
