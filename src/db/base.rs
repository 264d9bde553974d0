//! Generic CRUD over a row model, parameterized by its create and update schemas.

use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection};

use crate::db::filter::{Criterion, Filter, Page, Selection, SqlValue};
use crate::db::sql::{self, bind_all};
use crate::error::AppError;

/// Column/value pairs produced by a schema.
pub type Fields = Vec<(&'static str, SqlValue)>;

/// A table-backed row type with an integer `id` primary key.
pub trait Model: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Name used in error details.
    const NAME: &'static str;
    /// Every column a caller may filter on or write to.
    const COLUMNS: &'static [&'static str];
    /// Whether the table carries `created_at`/`updated_at`.
    const TIMESTAMPED: bool = true;

    fn id(&self) -> i32;
}

/// A validated payload that can be inserted as a new row.
pub trait CreateSchema {
    fn into_values(self) -> Result<Fields, AppError>;
}

/// A partial payload; only fields that were present are returned.
pub trait UpdateSchema {
    fn into_changes(self) -> Result<Fields, AppError>;
}

pub struct CrudBase<M, C, U> {
    marker: PhantomData<fn() -> (M, C, U)>,
}

impl<M, C, U> CrudBase<M, C, U> {
    pub const fn new() -> Self {
        CrudBase {
            marker: PhantomData,
        }
    }
}

impl<M, C, U> Default for CrudBase<M, C, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, C, U> CrudBase<M, C, U>
where
    M: Model,
    C: CreateSchema,
    U: UpdateSchema,
{
    /// Row whose primary key equals `id`, if any.
    pub async fn get(&self, conn: &mut PgConnection, id: i32) -> Result<Option<M>, AppError> {
        let q = sql::select_by_id::<M>(id);
        tracing::debug!(sql = %q.sql, id, "get");
        let row = bind_all(sqlx::query_as::<_, M>(&q.sql), &q.params)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    pub async fn get_or_404(&self, conn: &mut PgConnection, id: i32) -> Result<M, AppError> {
        self.get(conn, id).await?.ok_or_else(|| {
            AppError::NotFound(format!("{} with id {id} does not exist", M::NAME))
        })
    }

    /// True iff at least one row matches every equality criterion.
    pub async fn exists(
        &self,
        conn: &mut PgConnection,
        criteria: &[(&str, SqlValue)],
    ) -> Result<bool, AppError> {
        let filters = equality_filters(criteria);
        let q = sql::exists::<M>(&filters)?;
        tracing::debug!(sql = %q.sql, "exists");
        let (found,) = bind_all(sqlx::query_as::<_, (bool,)>(&q.sql), &q.params)
            .fetch_one(&mut *conn)
            .await?;
        Ok(found)
    }

    pub async fn get_multi(&self, conn: &mut PgConnection, page: Page) -> Result<Vec<M>, AppError> {
        let q = sql::select::<M>(&[], Criterion::And, page)?;
        self.fetch_all(conn, &q).await
    }

    /// Equality filter. With `multiple == false` only the first row of the
    /// window is returned.
    pub async fn filter_by(
        &self,
        conn: &mut PgConnection,
        page: Page,
        multiple: bool,
        criteria: &[(&str, SqlValue)],
    ) -> Result<Selection<M>, AppError> {
        let filters = equality_filters(criteria);
        self.filter(conn, &filters, Criterion::And, page, multiple)
            .await
    }

    /// Arbitrary predicates combined with `criterion`.
    pub async fn filter(
        &self,
        conn: &mut PgConnection,
        filters: &[Filter],
        criterion: Criterion,
        page: Page,
        multiple: bool,
    ) -> Result<Selection<M>, AppError> {
        if multiple {
            let q = sql::select::<M>(filters, criterion, page)?;
            return Ok(Selection::Many(self.fetch_all(conn, &q).await?));
        }

        let first = Page::new(page.skip, page.limit.min(1));
        let q = sql::select::<M>(filters, criterion, first)?;
        tracing::debug!(sql = %q.sql, "filter one");
        let row = bind_all(sqlx::query_as::<_, M>(&q.sql), &q.params)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(Selection::One(row))
    }

    /// Insert a new row and return it as stored.
    pub async fn create(&self, conn: &mut PgConnection, obj_in: C) -> Result<M, AppError> {
        let values = obj_in.into_values()?;
        let q = sql::insert::<M>(&values)?;
        tracing::debug!(sql = %q.sql, "create");
        let row = bind_all(sqlx::query_as::<_, M>(&q.sql), &q.params)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::classify_create(M::NAME, e))?;
        tracing::info!("{} {} created", M::NAME, row.id());
        Ok(row)
    }

    /// Apply the fields present in `obj_in` onto `db_obj`.
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        db_obj: &M,
        obj_in: U,
    ) -> Result<M, AppError> {
        let fields = obj_in.into_changes()?;
        self.update_fields(conn, db_obj, fields).await
    }

    pub async fn update_fields(
        &self,
        conn: &mut PgConnection,
        db_obj: &M,
        fields: Fields,
    ) -> Result<M, AppError> {
        let id = db_obj.id();
        if fields.is_empty() {
            return self.get_or_404(conn, id).await;
        }

        let q = sql::update::<M>(id, &fields)?;
        tracing::debug!(sql = %q.sql, id, "update");
        let row = bind_all(sqlx::query_as::<_, M>(&q.sql), &q.params)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::classify(M::NAME, e))?
            .ok_or_else(|| {
                AppError::NotFound(format!("{} with id {id} does not exist", M::NAME))
            })?;
        tracing::info!("{} {id} updated", M::NAME);
        Ok(row)
    }

    /// Remove the row and return its last-known state.
    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> Result<M, AppError> {
        let obj = self.get_or_404(conn, id).await?;
        let q = sql::delete::<M>(id);
        tracing::debug!(sql = %q.sql, id, "delete");
        let deleted = bind_all(sqlx::query_as::<_, M>(&q.sql), &q.params)
            .fetch_optional(&mut *conn)
            .await?;
        tracing::info!("{} {id} deleted", M::NAME);
        Ok(deleted.unwrap_or(obj))
    }

    async fn fetch_all(&self, conn: &mut PgConnection, q: &sql::QueryBuf) -> Result<Vec<M>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query_as::<_, M>(&q.sql), &q.params)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }
}

fn equality_filters(criteria: &[(&str, SqlValue)]) -> Vec<Filter> {
    criteria
        .iter()
        .map(|(column, value)| Filter::eq(*column, value.clone()))
        .collect()
}
