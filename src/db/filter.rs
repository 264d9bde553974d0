//! Query arguments accepted by the generic CRUD layer.

pub const DEFAULT_LIMIT: u32 = 100;

/// A value bound into a generated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Rendered as a literal `NULL`, never bound.
    Null,
    Bool(bool),
    Int(i32),
    BigInt(i64),
    Text(String),
    /// A Postgres enum label, bound as text and cast to `type_name`.
    Enum {
        type_name: &'static str,
        value: &'static str,
    },
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    ILike,
    IsNull,
    IsNotNull,
}

impl Op {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Like => "LIKE",
            Op::ILike => "ILIKE",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
        }
    }
}

/// One predicate: `column op value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: Op,
    pub value: SqlValue,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: Op, value: impl Into<SqlValue>) -> Self {
        Filter {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Op::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Op::Ne, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Op::Lt, value)
    }

    pub fn le(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Op::Le, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Op::Gt, value)
    }

    pub fn ge(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Op::Ge, value)
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(column, Op::Like, pattern.into())
    }

    pub fn ilike(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(column, Op::ILike, pattern.into())
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::new(column, Op::IsNull, SqlValue::Null)
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::new(column, Op::IsNotNull, SqlValue::Null)
    }
}

/// How a list of filters is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    #[default]
    And,
    Or,
}

/// Offset/limit window. Defaults to the first 100 rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Page { skip, limit }
    }

    pub fn from_query(skip: Option<u32>, limit: Option<u32>) -> Self {
        Page {
            skip: skip.unwrap_or(0),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Result of a filter call: every row in the window, or at most the first.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<M> {
    Many(Vec<M>),
    One(Option<M>),
}

impl<M> Selection<M> {
    pub fn into_many(self) -> Vec<M> {
        match self {
            Selection::Many(rows) => rows,
            Selection::One(row) => row.into_iter().collect(),
        }
    }

    pub fn into_one(self) -> Option<M> {
        match self {
            Selection::Many(rows) => rows.into_iter().next(),
            Selection::One(row) => row,
        }
    }
}
