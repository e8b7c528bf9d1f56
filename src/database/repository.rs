use sqlx::{self, postgres::PgRow, FromRow, PgPool, Row};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::{bind_param_query_as, QueryBuilder, SqlParam};

/// Table-scoped data access for one row type. Every content table has an
/// integer `id`, a unique `slug` and `created_at`/`updated_at` columns.
pub struct Repository<T> {
    table_name: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Result<Self, DatabaseError> {
        if !DatabaseManager::is_valid_table_name(table_name) {
            return Err(DatabaseError::QueryError(format!("invalid table name: {}", table_name)));
        }
        Ok(Self {
            table_name,
            pool,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn query(&self) -> Result<QueryBuilder<T>, DatabaseError> {
        QueryBuilder::new(self.table_name)
    }

    pub async fn select_any(&self, builder: QueryBuilder<T>) -> Result<Vec<T>, DatabaseError> {
        builder.select_all(&self.pool).await
    }

    /// Rows matching `builder` together with the unpaginated total.
    pub async fn select_page(&self, builder: QueryBuilder<T>) -> Result<(Vec<T>, i64), DatabaseError> {
        let total = builder.count(&self.pool).await?;
        let rows = builder.select_all(&self.pool).await?;
        Ok((rows, total))
    }

    pub async fn select_404(&self, builder: QueryBuilder<T>, what: &str) -> Result<T, DatabaseError> {
        builder
            .select_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", what)))
    }

    pub async fn select_by_id(&self, id: i32) -> Result<T, DatabaseError> {
        self.select_404(self.query()?.where_eq("id", id), self.table_name).await
    }

    /// Whether another row already uses `slug`. On update pass the row's own
    /// id so it does not conflict with itself.
    pub async fn slug_taken(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool, DatabaseError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM \"{}\" WHERE slug = $1 AND ($2::int IS NULL OR id <> $2)) AS taken",
            self.table_name
        );
        let row = sqlx::query(&sql)
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("taken")?)
    }

    /// INSERT ... RETURNING *. A unique violation surfaces as
    /// `DatabaseError::Conflict`.
    pub async fn insert(&self, columns: &[(&'static str, SqlParam)]) -> Result<T, DatabaseError> {
        let names = columns
            .iter()
            .map(|(c, _)| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
            self.table_name, names, placeholders
        );

        let mut q = sqlx::query_as::<_, T>(&sql);
        for (_, p) in columns {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_one(&self.pool).await?)
    }

    /// UPDATE ... RETURNING *, bumping `updated_at`. `NotFound` when no row
    /// has `id`.
    pub async fn update(&self, id: i32, columns: &[(&'static str, SqlParam)]) -> Result<T, DatabaseError> {
        let mut assignments = columns
            .iter()
            .enumerate()
            .map(|(i, (c, _))| format!("\"{}\" = ${}", c, i + 1))
            .collect::<Vec<_>>();
        assignments.push("\"updated_at\" = NOW()".to_string());
        let sql = format!(
            "UPDATE \"{}\" SET {} WHERE id = ${} RETURNING *",
            self.table_name,
            assignments.join(", "),
            columns.len() + 1
        );

        let id_param = SqlParam::Int(Some(id));
        let mut q = sqlx::query_as::<_, T>(&sql);
        for (_, p) in columns {
            q = bind_param_query_as(q, p);
        }
        q = bind_param_query_as(q, &id_param);
        q.fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {} not found", self.table_name, id)))
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.table_name);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} {} not found", self.table_name, id)));
        }
        Ok(())
    }
}
