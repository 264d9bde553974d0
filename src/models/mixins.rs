use chrono::{DateTime, Utc};
use serde::Serialize;

/// Columns shared by every timestamped table. Both default to `now()` on
/// insert; the CRUD layer bumps `updated_at` on every update.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
