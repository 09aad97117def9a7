//! Vector stores holding one embedding per doctor.
//!
//! `PgVectorStore` persists to PostgreSQL + pgvector; `InMemoryVectorStore`
//! keeps everything in process for development and tests. Both rank by
//! cosine distance, so `similarity = 1 - distance` means the same thing
//! regardless of backend.

mod memory;
mod postgres;

pub use self::memory::InMemoryVectorStore;
pub use self::postgres::PgVectorStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::models::{ScoredRecord, SearchFilter, VectorRecord};

/// Layout version of `doctor_vectors`. Bump whenever columns or the embedding
/// text format change; a mismatch forces a drop and re-ingest.
pub const SCHEMA_VERSION: i32 = 1;

/// Logical collection name recorded in the schema table.
pub const COLLECTION: &str = "doctor_vectors";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Dimension mismatch: collection expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Corrupt metadata for {id}: {source}")]
    Metadata {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema not initialised; call ensure_schema first")]
    SchemaMissing,

    #[error("Unknown store backend: {0}")]
    UnknownBackend(String),
}

/// Outcome of `VectorStore::ensure_schema`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// No schema was recorded; the collection was created empty.
    Created,
    /// The recorded schema matches; existing vectors are kept.
    Existing,
    /// The recorded schema disagreed and the collection was rebuilt empty.
    Recreated { reason: String },
}

impl SchemaStatus {
    /// True when the collection is guaranteed empty afterwards.
    pub fn needs_ingest(&self) -> bool {
        !matches!(self, SchemaStatus::Existing)
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Make sure the collection exists for vectors of `dimensions` produced by `model`.
    async fn ensure_schema(&self, dimensions: usize, model: &str)
        -> Result<SchemaStatus, StoreError>;

    /// Insert or replace records by id. Returns the number written.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, StoreError>;

    /// Up to `n_results` records matching `filter`, ascending cosine distance.
    async fn query(
        &self,
        embedding: &[f32],
        filter: &SearchFilter,
        n_results: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// First `limit` records ordered by id.
    async fn fetch(&self, limit: usize) -> Result<Vec<VectorRecord>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<VectorRecord>, StoreError>;

    /// Drop every record and the recorded schema.
    async fn reset(&self) -> Result<(), StoreError>;

    fn name(&self) -> &str;
}

/// Build the store selected by `database.backend`.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn VectorStore>, StoreError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryVectorStore::new())),
        "postgres" | "pgvector" => {
            let pool = crate::db::connect(config).await?;
            crate::db::ensure_pgvector(&pool).await?;
            Ok(Arc::new(PgVectorStore::new(pool)))
        }
        other => Err(StoreError::UnknownBackend(other.to_string())),
    }
}

/// Compare a recorded schema against the running one.
pub(crate) fn schema_mismatch(
    recorded: (i32, usize, &str),
    dimensions: usize,
    model: &str,
) -> Option<String> {
    let (version, recorded_dims, recorded_model) = recorded;
    if version != SCHEMA_VERSION {
        Some(format!(
            "schema version {version} != expected {SCHEMA_VERSION}"
        ))
    } else if recorded_dims != dimensions {
        Some(format!(
            "embedding dimensions {recorded_dims} != expected {dimensions}"
        ))
    } else if recorded_model != model {
        Some(format!(
            "embedding model {recorded_model} != expected {model}"
        ))
    } else {
        None
    }
}
