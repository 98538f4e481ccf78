use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::{self, PgPool};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::QueryBuilder;
use crate::filter::filter::select_json;
use crate::filter::ListOptions;
use crate::services::{EntityService, Fields, ServiceError};
use crate::types::EntityKind;

/// Postgres-backed entity service over one table.
///
/// Rows travel as JSON both ways: reads go through `row_to_json`, writes
/// through `jsonb_populate_record`, so column types are resolved by the table.
pub struct PgRepository<T> {
    kind: EntityKind,
    pool: PgPool,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> PgRepository<T>
where
    T: DeserializeOwned + Send + Sync,
{
    pub fn new(kind: EntityKind, pool: PgPool) -> Self {
        Self {
            kind,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    fn table(&self) -> String {
        DatabaseManager::quote_identifier(self.kind.table_name())
    }

    fn columns(fields: &Fields) -> Result<String, DatabaseError> {
        let columns = fields
            .keys()
            .map(|key| DatabaseManager::checked_identifier(key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns.join(", "))
    }

    fn decode(row: Value) -> Result<T, ServiceError> {
        Ok(serde_json::from_value(row)?)
    }

    /// Tells a missing row apart from one in the wrong deletion state.
    async fn missing_or_conflict(&self, id: Uuid, conflict: &str) -> ServiceError {
        match QueryBuilder::new(self.kind.table_name()).and_then(|q| q.by_id(id)) {
            Ok(query) => match query.select_optional(&self.pool).await {
                Ok(Some(_)) => ServiceError::Conflict(format!("{} {}", self.kind.label(), conflict)),
                Ok(None) => ServiceError::not_found(self.kind),
                Err(e) => e.into(),
            },
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
impl<T> EntityService<T> for PgRepository<T>
where
    T: DeserializeOwned + Send + Sync,
{
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn get_all(&self, options: &ListOptions) -> Result<Vec<T>, ServiceError> {
        let rows = QueryBuilder::new(self.kind.table_name())?
            .options(options)?
            .select_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::decode).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<T, ServiceError> {
        QueryBuilder::new(self.kind.table_name())?
            .by_id(id)?
            .select_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(self.kind))
            .and_then(Self::decode)
    }

    async fn create(&self, fields: Fields) -> Result<T, ServiceError> {
        let table = self.table();
        let insert = if fields.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES RETURNING *", table)
        } else {
            let columns = Self::columns(&fields)?;
            format!(
                "INSERT INTO {table} ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1) RETURNING *",
                table = table,
                columns = columns
            )
        };
        let query = format!("WITH inserted AS ({}) {}", insert, select_json("inserted"));
        tracing::debug!(query = %query, "insert");

        let mut q = sqlx::query_scalar::<_, Value>(&query);
        if !fields.is_empty() {
            q = q.bind(Value::Object(fields));
        }
        let row = q.fetch_one(&self.pool).await.map_err(DatabaseError::from)?;
        tracing::info!(entity = %self.kind, id = %row["id"], "created");
        Self::decode(row)
    }

    async fn update(&self, id: Uuid, fields: Fields) -> Result<T, ServiceError> {
        let table = self.table();
        let (update, id_param) = if fields.is_empty() {
            (format!("UPDATE {} SET \"updated_at\" = now() WHERE \"id\" = $1 RETURNING *", table), 1)
        } else {
            let columns = Self::columns(&fields)?;
            (
                format!(
                    "UPDATE {table} SET ({columns}) = (SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)), \"updated_at\" = now() WHERE \"id\" = $2 RETURNING *",
                    table = table,
                    columns = columns
                ),
                2,
            )
        };
        let query = format!("WITH updated AS ({}) {}", update, select_json("updated"));
        tracing::debug!(query = %query, id_param, "update");

        let mut q = sqlx::query_scalar::<_, Value>(&query);
        if !fields.is_empty() {
            q = q.bind(Value::Object(fields));
        }
        let row = q
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?
            .ok_or_else(|| ServiceError::not_found(self.kind))?;
        tracing::info!(entity = %self.kind, %id, "updated");
        Self::decode(row)
    }

    async fn soft_delete(&self, id: Uuid, actor_id: Uuid) -> Result<T, ServiceError> {
        let query = format!(
            "WITH deleted AS (UPDATE {} SET \"deleted_at\" = now(), \"deleted_by\" = $2 WHERE \"id\" = $1 AND \"deleted_at\" IS NULL RETURNING *) {}",
            self.table(),
            select_json("deleted")
        );
        let row = sqlx::query_scalar::<_, Value>(&query)
            .bind(id)
            .bind(actor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        match row {
            Some(row) => {
                tracing::info!(entity = %self.kind, %id, %actor_id, "soft deleted");
                Self::decode(row)
            }
            None => Err(self.missing_or_conflict(id, "is already deleted").await),
        }
    }

    async fn restore(&self, id: Uuid) -> Result<T, ServiceError> {
        let query = format!(
            "WITH restored AS (UPDATE {} SET \"deleted_at\" = NULL, \"deleted_by\" = NULL WHERE \"id\" = $1 AND \"deleted_at\" IS NOT NULL RETURNING *) {}",
            self.table(),
            select_json("restored")
        );
        let row = sqlx::query_scalar::<_, Value>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        match row {
            Some(row) => {
                tracing::info!(entity = %self.kind, %id, "restored");
                Self::decode(row)
            }
            None => Err(self.missing_or_conflict(id, "is not deleted").await),
        }
    }
}
