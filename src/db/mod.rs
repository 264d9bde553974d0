pub mod base;
pub mod filter;
pub mod profiles;
pub mod session;
pub mod sql;
pub mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;

pub use base::{CreateSchema, CrudBase, Fields, Model, UpdateSchema};
pub use filter::{Criterion, Filter, Op, Page, Selection, SqlValue};
pub use session::DbSession;

/// Build the shared connection pool.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await
}
