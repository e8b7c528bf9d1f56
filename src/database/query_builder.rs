use sqlx::{self, postgres::{PgArguments, PgRow}, FromRow, PgPool, Postgres, Row};

use crate::database::manager::{DatabaseError, DatabaseManager};

/// Typed bind parameter. Nulls keep their column type so Postgres does not
/// have to guess it.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(Option<String>),
    Int(Option<i32>),
    BigInt(i64),
    Float(Option<f64>),
    Bool(bool),
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(Some(v.to_string()))
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(Some(v))
    }
}

impl From<Option<String>> for SqlParam {
    fn from(v: Option<String>) -> Self {
        SqlParam::Text(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(Some(v))
    }
}

impl From<Option<i32>> for SqlParam {
    fn from(v: Option<i32>) -> Self {
        SqlParam::Int(v)
    }
}

impl From<Option<f64>> for SqlParam {
    fn from(v: Option<f64>) -> Self {
        SqlParam::Float(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Small SELECT builder for list endpoints: equality filters, a text
/// search across columns, ordering and pagination.
///
/// Column names and ORDER BY clauses are `&'static str` and come from code;
/// user input only ever reaches the query as bound parameters.
pub struct QueryBuilder<T> {
    table_name: String,
    conditions: Vec<String>,
    params: Vec<SqlParam>,
    order: Option<&'static str>,
    limit: Option<i64>,
    offset: Option<i64>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let name = table_name.into();
        if !DatabaseManager::is_valid_table_name(&name) {
            return Err(DatabaseError::QueryError(format!("invalid table name: {}", name)));
        }
        Ok(Self {
            table_name: name,
            conditions: Vec::new(),
            params: Vec::new(),
            order: None,
            limit: None,
            offset: None,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn where_eq(mut self, column: &'static str, value: impl Into<SqlParam>) -> Self {
        let placeholder = self.push_param(value.into());
        self.conditions.push(format!("\"{}\" = {}", column, placeholder));
        self
    }

    /// Case-insensitive substring match on any of `columns`.
    pub fn where_search(mut self, columns: &[&'static str], term: &str) -> Self {
        if columns.is_empty() || term.trim().is_empty() {
            return self;
        }
        let placeholder = self.push_param(SqlParam::from(format!("%{}%", escape_like(term.trim()))));
        let any = columns
            .iter()
            .map(|c| format!("\"{}\" ILIKE {}", c, placeholder))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.conditions.push(format!("({})", any));
        self
    }

    pub fn order_by(mut self, clause: &'static str) -> Self {
        self.order = Some(clause);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn push_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    fn where_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn to_select_sql(&self) -> SqlResult {
        let mut params = self.params.clone();
        let mut query = format!("SELECT * FROM \"{}\"{}", self.table_name, self.where_sql());
        if let Some(order) = self.order {
            query.push_str(&format!(" ORDER BY {}", order));
        }
        if let Some(limit) = self.limit {
            params.push(SqlParam::BigInt(limit));
            query.push_str(&format!(" LIMIT ${}", params.len()));
        }
        if let Some(offset) = self.offset {
            params.push(SqlParam::BigInt(offset));
            query.push_str(&format!(" OFFSET ${}", params.len()));
        }
        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        SqlResult {
            query: format!("SELECT COUNT(*) AS count FROM \"{}\"{}", self.table_name, self.where_sql()),
            params: self.params.clone(),
        }
    }

    pub async fn select_all(&self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.to_select_sql();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(pool).await?)
    }

    pub async fn select_optional(&self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.to_select_sql();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_optional(pool).await?)
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.to_count_sql();
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

pub(crate) fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match p {
        SqlParam::Text(v) => q.bind(v.as_deref()),
        SqlParam::Int(v) => q.bind(*v),
        SqlParam::BigInt(v) => q.bind(*v),
        SqlParam::Float(v) => q.bind(*v),
        SqlParam::Bool(v) => q.bind(*v),
    }
}

pub(crate) fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match p {
        SqlParam::Text(v) => q.bind(v.as_deref()),
        SqlParam::Int(v) => q.bind(*v),
        SqlParam::BigInt(v) => q.bind(*v),
        SqlParam::Float(v) => q.bind(*v),
        SqlParam::Bool(v) => q.bind(*v),
    }
}
