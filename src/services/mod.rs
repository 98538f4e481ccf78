// services/mod.rs - Entity CRUD behind one trait
//
// Every content type is served by the same generic repository, parameterized
// by table name and row type. Postgres backs production; the in-process
// memory store backs development and tests with the same semantics.

pub mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::{DatabaseError, DatabaseManager, PgRepository};
use crate::filter::FilterError;
pub use crate::filter::ListOptions;
pub use crate::types::EntityKind;
pub use memory::MemoryRepository;

/// Column values for create and update, already validated.
pub type Fields = Map<String, Value>;

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Validation { message: String, field_errors: FieldErrors },

    #[error(transparent)]
    Query(#[from] FilterError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Malformed record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind) -> Self {
        ServiceError::NotFound(format!("{} not found", kind.label()))
    }

    pub fn validation(field_errors: FieldErrors) -> Self {
        ServiceError::Validation {
            message: "Validation failed".to_string(),
            field_errors,
        }
    }
}

#[async_trait]
pub trait EntityService<T>: Send + Sync {
    fn kind(&self) -> EntityKind;

    async fn get_all(&self, options: &ListOptions) -> Result<Vec<T>, ServiceError>;

    /// Finds a row whether or not it is soft-deleted.
    async fn get_by_id(&self, id: Uuid) -> Result<T, ServiceError>;

    async fn create(&self, fields: Fields) -> Result<T, ServiceError>;

    async fn update(&self, id: Uuid, fields: Fields) -> Result<T, ServiceError>;

    /// Stamps `deleted_at` and `deleted_by`. Deleting twice is a conflict.
    async fn soft_delete(&self, id: Uuid, actor_id: Uuid) -> Result<T, ServiceError>;

    /// Clears the deletion stamp. Restoring a live row is a conflict.
    async fn restore(&self, id: Uuid) -> Result<T, ServiceError>;
}

pub type DynEntityService = Arc<dyn EntityService<Value>>;

#[derive(Clone)]
enum Backend {
    Memory,
    Postgres(PgPool),
}

/// One service per [`EntityKind`], all on the same backend.
#[derive(Clone)]
pub struct Services {
    backend: Backend,
    entities: [DynEntityService; 5],
}

impl Services {
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory,
            entities: EntityKind::ALL.map(|kind| Arc::new(MemoryRepository::<Value>::new(kind)) as DynEntityService),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            entities: EntityKind::ALL
                .map(|kind| Arc::new(PgRepository::<Value>::new(kind, pool.clone())) as DynEntityService),
            backend: Backend::Postgres(pool),
        }
    }

    pub fn entity(&self, kind: EntityKind) -> &DynEntityService {
        &self.entities[kind.index()]
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory => "memory",
            Backend::Postgres(_) => "postgres",
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.backend {
            Backend::Memory => Ok(()),
            Backend::Postgres(pool) => DatabaseManager::health_check(pool).await,
        }
    }
}
