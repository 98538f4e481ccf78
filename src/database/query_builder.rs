use serde_json::Value;
use sqlx::{self, postgres::PgArguments, PgPool, Postgres};

use crate::database::manager::DatabaseError;
use crate::filter::types::SqlResult;
use crate::filter::{Filter, FilterError, ListOptions};

/// Read queries over one entity table, decoded as JSON rows.
pub struct QueryBuilder {
    filter: Filter,
}

impl QueryBuilder {
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let filter = Filter::new(table_name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(Self { filter })
    }

    pub fn options(mut self, options: &ListOptions) -> Result<Self, FilterError> {
        self.filter.assign(options)?;
        Ok(self)
    }

    /// Matches a single id, deleted or not.
    pub fn by_id(mut self, id: uuid::Uuid) -> Result<Self, DatabaseError> {
        self.filter
            .include_deleted(true)
            .where_equals("id", Value::String(id.to_string()))
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(self)
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<Value>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        tracing::debug!(query = %sql_result.query, "select");
        let rows = bind_params(sqlx::query_scalar::<_, Value>(&sql_result.query), &sql_result)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<Value>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        tracing::debug!(query = %sql_result.query, "select one");
        let row = bind_params(sqlx::query_scalar::<_, Value>(&sql_result.query), &sql_result)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}

fn bind_params<'q, O>(
    mut q: sqlx::query::QueryScalar<'q, Postgres, O, PgArguments>,
    sql_result: &'q SqlResult,
) -> sqlx::query::QueryScalar<'q, Postgres, O, PgArguments> {
    for p in sql_result.params.iter() {
        q = q.bind(p.as_str());
    }
    q
}
