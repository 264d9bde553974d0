//! Builds parameterized SELECT, INSERT, UPDATE and DELETE statements for a [`Model`].
//!
//! Identifiers only ever come from a model's column whitelist; values are
//! always bound as parameters.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

use crate::db::base::{Fields, Model};
use crate::db::filter::{Criterion, Filter, Op, Page, SqlValue};
use crate::error::AppError;

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Register a value and return the placeholder to splice into the SQL.
    fn placeholder(&mut self, value: &SqlValue) -> String {
        match value {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Enum { type_name, .. } => {
                self.params.push(value.clone());
                format!("${}::{}", self.params.len(), quoted(type_name))
            }
            _ => {
                self.params.push(value.clone());
                format!("${}", self.params.len())
            }
        }
    }

    fn push_page(&mut self, page: Page) {
        let limit = self.placeholder(&SqlValue::BigInt(i64::from(page.limit)));
        let offset = self.placeholder(&SqlValue::BigInt(i64::from(page.skip)));
        self.sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
    }
}

/// Quote an identifier for PostgreSQL.
pub fn quoted(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn ensure_column<M: Model>(column: &str) -> Result<(), AppError> {
    if M::COLUMNS.contains(&column) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Unknown field '{column}' for {}",
            M::NAME
        )))
    }
}

fn render_filter(q: &mut QueryBuf, filter: &Filter) -> String {
    let column = quoted(&filter.column);
    match (filter.op, &filter.value) {
        (Op::IsNull, _) | (Op::Eq, SqlValue::Null) => format!("{column} IS NULL"),
        (Op::IsNotNull, _) | (Op::Ne, SqlValue::Null) => format!("{column} IS NOT NULL"),
        (op, value) => {
            let ph = q.placeholder(value);
            format!("{column} {} {ph}", op.as_sql())
        }
    }
}

fn push_where<M: Model>(
    q: &mut QueryBuf,
    filters: &[Filter],
    criterion: Criterion,
) -> Result<(), AppError> {
    if filters.is_empty() {
        // An empty disjunction is false; an empty conjunction is true.
        if criterion == Criterion::Or {
            q.sql.push_str(" WHERE FALSE");
        }
        return Ok(());
    }

    let mut parts = Vec::with_capacity(filters.len());
    for filter in filters {
        ensure_column::<M>(&filter.column)?;
        parts.push(render_filter(q, filter));
    }

    let joiner = match criterion {
        Criterion::And => " AND ",
        Criterion::Or => " OR ",
    };
    q.sql.push_str(" WHERE (");
    q.sql.push_str(&parts.join(joiner));
    q.sql.push(')');
    Ok(())
}

/// `SELECT *` filtered, ordered by primary key and windowed by `page`.
pub fn select<M: Model>(
    filters: &[Filter],
    criterion: Criterion,
    page: Page,
) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT * FROM {}", quoted(M::TABLE));
    push_where::<M>(&mut q, filters, criterion)?;
    q.sql.push_str(" ORDER BY \"id\"");
    q.push_page(page);
    Ok(q)
}

/// `SELECT *` by primary key. The id is the sole parameter.
pub fn select_by_id<M: Model>(id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(&SqlValue::Int(id));
    q.sql = format!("SELECT * FROM {} WHERE \"id\" = {ph}", quoted(M::TABLE));
    q
}

/// `SELECT EXISTS (...)` over the conjunction of `filters`.
pub fn exists<M: Model>(filters: &[Filter]) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT 1 FROM {}", quoted(M::TABLE));
    push_where::<M>(&mut q, filters, Criterion::And)?;
    q.sql = format!("SELECT EXISTS ({} LIMIT 1)", q.sql);
    Ok(q)
}

pub fn insert<M: Model>(values: &Fields) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let table = quoted(M::TABLE);
    if values.is_empty() {
        q.sql = format!("INSERT INTO {table} DEFAULT VALUES RETURNING *");
        return Ok(q);
    }

    let mut columns = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (column, value) in values {
        ensure_column::<M>(column)?;
        columns.push(quoted(column));
        placeholders.push(q.placeholder(value));
    }
    q.sql = format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING *",
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(q)
}

/// `UPDATE ... SET` for the given fields only. Timestamped models also get
/// `updated_at = now()`.
pub fn update<M: Model>(id: i32, fields: &Fields) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut assignments = Vec::with_capacity(fields.len() + 1);
    for (column, value) in fields {
        ensure_column::<M>(column)?;
        if *column == "id" {
            return Err(AppError::BadRequest(format!(
                "The id of a {} cannot be changed",
                M::NAME
            )));
        }
        let ph = q.placeholder(value);
        assignments.push(format!("{} = {ph}", quoted(column)));
    }
    if M::TIMESTAMPED && !fields.iter().any(|(c, _)| *c == "updated_at") {
        assignments.push("\"updated_at\" = now()".to_string());
    }
    let id_ph = q.placeholder(&SqlValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = {id_ph} RETURNING *",
        quoted(M::TABLE),
        assignments.join(", ")
    );
    Ok(q)
}

pub fn delete<M: Model>(id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(&SqlValue::Int(id));
    q.sql = format!(
        "DELETE FROM {} WHERE \"id\" = {ph} RETURNING *",
        quoted(M::TABLE)
    );
    q
}

/// Bind every registered parameter, in order, onto a typed query.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query,
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::BigInt(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Enum { value, .. } => query.bind(*value),
        };
    }
    query
}
