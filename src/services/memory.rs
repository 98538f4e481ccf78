use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityService, Fields, ServiceError};
use crate::filter::{capped_limit, ListOptions};
use crate::table::pipeline::compare_rows;
use crate::table::row::{present, stringify};
use crate::types::EntityKind;

/// In-process entity store with the same semantics as the Postgres repository.
pub struct MemoryRepository<T> {
    kind: EntityKind,
    rows: RwLock<Vec<Fields>>,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> MemoryRepository<T>
where
    T: DeserializeOwned + Send + Sync,
{
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            rows: RwLock::new(Vec::new()),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Seeds the store. Rows missing system columns get them filled in.
    pub fn with_rows(kind: EntityKind, rows: Vec<Fields>) -> Self {
        let now = Utc::now().to_rfc3339();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.entry("id").or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
                row.entry("created_at").or_insert_with(|| Value::String(now.clone()));
                row.entry("updated_at").or_insert_with(|| Value::String(now.clone()));
                row.entry("deleted_at").or_insert(Value::Null);
                row.entry("deleted_by").or_insert(Value::Null);
                row.remove("is_deleted");
                row
            })
            .collect();
        Self {
            kind,
            rows: RwLock::new(rows),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Stored row plus the computed `is_deleted` column.
    fn project(row: &Fields) -> Value {
        let mut projected = row.clone();
        let deleted = present(row, "deleted_at").is_some();
        projected.insert("is_deleted".to_string(), Value::Bool(deleted));
        Value::Object(projected)
    }

    fn decode(row: &Fields) -> Result<T, ServiceError> {
        Ok(serde_json::from_value(Self::project(row))?)
    }

    fn matches(row: &Value, options: &ListOptions) -> bool {
        if !options.include_deleted && row["is_deleted"] == Value::Bool(true) {
            return false;
        }
        options.equals.iter().all(|(column, expected)| {
            let actual = present(row, column).and_then(stringify);
            actual == stringify(expected)
        })
    }

    fn position(rows: &[Fields], id: Uuid) -> Option<usize> {
        let id = id.to_string();
        rows.iter().position(|row| row.get("id").and_then(Value::as_str) == Some(id.as_str()))
    }
}

#[async_trait]
impl<T> EntityService<T> for MemoryRepository<T>
where
    T: DeserializeOwned + Send + Sync,
{
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn get_all(&self, options: &ListOptions) -> Result<Vec<T>, ServiceError> {
        let rows = self.rows.read().await;
        let mut selected: Vec<Value> = rows
            .iter()
            .map(Self::project)
            .filter(|row| Self::matches(row, options))
            .collect();

        if !options.order.is_empty() {
            selected.sort_by(|a, b| {
                options
                    .order
                    .iter()
                    .map(|(column, direction)| compare_rows(a, b, column, *direction))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        if let Some(limit) = options.limit {
            selected.truncate(capped_limit(limit)?);
        }

        selected
            .into_iter()
            .map(|row| Ok(serde_json::from_value(row)?))
            .collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<T, ServiceError> {
        let rows = self.rows.read().await;
        let index = Self::position(&rows, id).ok_or_else(|| ServiceError::not_found(self.kind))?;
        Self::decode(&rows[index])
    }

    async fn create(&self, fields: Fields) -> Result<T, ServiceError> {
        let now = Value::String(Utc::now().to_rfc3339());
        let id = Uuid::new_v4();

        let mut row = fields;
        row.insert("id".to_string(), Value::String(id.to_string()));
        row.insert("created_at".to_string(), now.clone());
        row.insert("updated_at".to_string(), now);
        row.insert("deleted_at".to_string(), Value::Null);
        row.insert("deleted_by".to_string(), Value::Null);

        let created = Self::decode(&row)?;
        self.rows.write().await.push(row);
        tracing::info!(entity = %self.kind, %id, "created");
        Ok(created)
    }

    async fn update(&self, id: Uuid, fields: Fields) -> Result<T, ServiceError> {
        let mut rows = self.rows.write().await;
        let index = Self::position(&rows, id).ok_or_else(|| ServiceError::not_found(self.kind))?;

        let mut row = rows[index].clone();
        row.extend(fields);
        row.insert("updated_at".to_string(), Value::String(Utc::now().to_rfc3339()));

        let updated = Self::decode(&row)?;
        rows[index] = row;
        tracing::info!(entity = %self.kind, %id, "updated");
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid, actor_id: Uuid) -> Result<T, ServiceError> {
        let mut rows = self.rows.write().await;
        let index = Self::position(&rows, id).ok_or_else(|| ServiceError::not_found(self.kind))?;
        if present(&rows[index], "deleted_at").is_some() {
            return Err(ServiceError::Conflict(format!("{} is already deleted", self.kind.label())));
        }

        let row = &mut rows[index];
        row.insert("deleted_at".to_string(), Value::String(Utc::now().to_rfc3339()));
        row.insert("deleted_by".to_string(), Value::String(actor_id.to_string()));
        tracing::info!(entity = %self.kind, %id, %actor_id, "soft deleted");
        Self::decode(row)
    }

    async fn restore(&self, id: Uuid) -> Result<T, ServiceError> {
        let mut rows = self.rows.write().await;
        let index = Self::position(&rows, id).ok_or_else(|| ServiceError::not_found(self.kind))?;
        if present(&rows[index], "deleted_at").is_none() {
            return Err(ServiceError::Conflict(format!("{} is not deleted", self.kind.label())));
        }

        let row = &mut rows[index];
        row.insert("deleted_at".to_string(), Value::Null);
        row.insert("deleted_by".to_string(), Value::Null);
        tracing::info!(entity = %self.kind, %id, "restored");
        Self::decode(row)
    }
}
