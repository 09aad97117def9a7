use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{postgres::PgRow, PgPool, Postgres, Row, Transaction};

use super::{schema_mismatch, SchemaStatus, StoreError, VectorStore, COLLECTION, SCHEMA_VERSION};
use crate::models::{DoctorMetadata, ScoredRecord, SearchFilter, VectorRecord};

/// pgvector-backed store.
///
/// Queries are exact sequential scans ordered by `<=>`. With a few thousand
/// rows that is fast enough, and it keeps metadata-filtered queries exact
/// (an approximate index would filter after the candidate list is cut).
#[derive(Debug, Clone)]
pub struct PgVectorStore {
    pool: PgPool,
}

impl PgVectorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn ensure_meta_table(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS smartdoc_schema (
                collection TEXT PRIMARY KEY,
                version INTEGER NOT NULL,
                dimensions INTEGER NOT NULL,
                model TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recorded_schema(&self) -> Result<Option<(i32, usize, String)>, StoreError> {
        let row = sqlx::query(
            "SELECT version, dimensions, model FROM smartdoc_schema WHERE collection = $1",
        )
        .bind(COLLECTION)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let version: i32 = r.try_get("version")?;
            let dimensions: i32 = r.try_get("dimensions")?;
            let model: String = r.try_get("model")?;
            Ok::<_, StoreError>((version, dimensions.max(0) as usize, model))
        })
        .transpose()
    }

    /// Drop and recreate `doctor_vectors`, then record the new schema.
    async fn rebuild(&self, dimensions: usize, model: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS doctor_vectors")
            .execute(&mut *tx)
            .await?;
        create_table(&mut tx, dimensions).await?;

        sqlx::query(
            "INSERT INTO smartdoc_schema (collection, version, dimensions, model)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (collection) DO UPDATE
             SET version = EXCLUDED.version,
                 dimensions = EXCLUDED.dimensions,
                 model = EXCLUDED.model,
                 updated_at = now()",
        )
        .bind(COLLECTION)
        .bind(SCHEMA_VERSION)
        .bind(dimensions as i32)
        .bind(model)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn create_table(tx: &mut Transaction<'_, Postgres>, dimensions: usize) -> Result<(), StoreError> {
    // Column type depends on the model, so the DDL cannot use a bind parameter.
    let ddl = format!(
        "CREATE TABLE IF NOT EXISTS doctor_vectors (
            doctor_id TEXT PRIMARY KEY,
            embedding vector({dimensions}) NOT NULL,
            document TEXT NOT NULL,
            metadata JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"
    );
    sqlx::query(&ddl).execute(&mut **tx).await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS doctor_vectors_location_idx
         ON doctor_vectors ((metadata->>'location'))",
    )
    .execute(&mut **tx)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS doctor_vectors_specialty_idx
         ON doctor_vectors ((metadata->>'primary_specialty'))",
    )
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn decode_metadata(id: &str, value: serde_json::Value) -> Result<DoctorMetadata, StoreError> {
    serde_json::from_value(value).map_err(|source| StoreError::Metadata {
        id: id.to_string(),
        source,
    })
}

fn decode_record(row: &PgRow) -> Result<VectorRecord, StoreError> {
    let id: String = row.try_get("doctor_id")?;
    let embedding: Vector = row.try_get("embedding")?;
    let metadata = decode_metadata(&id, row.try_get("metadata")?)?;
    Ok(VectorRecord {
        embedding: embedding.to_vec(),
        document: row.try_get("document")?,
        metadata,
        id,
    })
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn ensure_schema(
        &self,
        dimensions: usize,
        model: &str,
    ) -> Result<SchemaStatus, StoreError> {
        self.ensure_meta_table().await?;

        let status = match self.recorded_schema().await? {
            None => SchemaStatus::Created,
            Some((version, dims, recorded_model)) => {
                match schema_mismatch((version, dims, &recorded_model), dimensions, model) {
                    None => {
                        let mut tx = self.pool.begin().await?;
                        create_table(&mut tx, dimensions).await?;
                        tx.commit().await?;
                        return Ok(SchemaStatus::Existing);
                    }
                    Some(reason) => {
                        tracing::warn!(
                            collection = COLLECTION,
                            %reason,
                            "Vector collection schema mismatch, dropping and recreating"
                        );
                        SchemaStatus::Recreated { reason }
                    }
                }
            }
        };

        self.rebuild(dimensions, model).await?;
        tracing::info!(collection = COLLECTION, dimensions, model, ?status, "Vector collection ready");
        Ok(status)
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            let metadata =
                serde_json::to_value(&record.metadata).map_err(|source| StoreError::Metadata {
                    id: record.id.clone(),
                    source,
                })?;

            sqlx::query(
                "INSERT INTO doctor_vectors (doctor_id, embedding, document, metadata)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (doctor_id) DO UPDATE
                 SET embedding = EXCLUDED.embedding,
                     document = EXCLUDED.document,
                     metadata = EXCLUDED.metadata",
            )
            .bind(&record.id)
            .bind(Vector::from(record.embedding.clone()))
            .bind(&record.document)
            .bind(metadata)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(records.len())
    }

    async fn query(
        &self,
        embedding: &[f32],
        filter: &SearchFilter,
        n_results: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT doctor_id, document, metadata,
                    (embedding <=> $1)::float8 AS distance
             FROM doctor_vectors
             WHERE ($2::text IS NULL OR metadata->>'location' = $2)
               AND ($3::text IS NULL OR metadata->>'primary_specialty' = $3)
             ORDER BY embedding <=> $1
             LIMIT $4",
        )
        .bind(Vector::from(embedding.to_vec()))
        .bind(filter.location.as_deref())
        .bind(filter.specialty.as_deref())
        .bind(n_results as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ScoredRecord, StoreError> {
                let id: String = row.try_get("doctor_id")?;
                Ok(ScoredRecord {
                    metadata: decode_metadata(&id, row.try_get("metadata")?)?,
                    document: row.try_get("document")?,
                    distance: row.try_get("distance")?,
                    id,
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM doctor_vectors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as usize)
    }

    async fn fetch(&self, limit: usize) -> Result<Vec<VectorRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT doctor_id, embedding, document, metadata
             FROM doctor_vectors ORDER BY doctor_id LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_record).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<VectorRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT doctor_id, embedding, document, metadata
             FROM doctor_vectors WHERE doctor_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode_record).transpose()
    }

    async fn reset(&self) -> Result<(), StoreError> {
        self.ensure_meta_table().await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS doctor_vectors")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM smartdoc_schema WHERE collection = $1")
            .bind(COLLECTION)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(collection = COLLECTION, "Vector collection dropped");
        Ok(())
    }

    fn name(&self) -> &str {
        "pgvector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::doctor::fixtures::profile;

    /// Tests run only when `SMARTDOC_TEST_DATABASE_URL` points at a scratch
    /// database with pgvector available; they drop `doctor_vectors`.
    async fn make_store() -> Option<PgVectorStore> {
        let url = std::env::var("SMARTDOC_TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        crate::db::ensure_pgvector(&pool).await.ok()?;
        let store = PgVectorStore::new(pool);
        store.reset().await.ok()?;
        Some(store)
    }

    #[tokio::test]
    async fn test_pgvector_round_trip_and_filters() {
        let store = match make_store().await {
            Some(s) => s,
            None => {
                eprintln!("Skipping test_pgvector_round_trip_and_filters: DB unavailable");
                return;
            }
        };

        assert_eq!(
            store.ensure_schema(2, "test-model").await.unwrap(),
            SchemaStatus::Created
        );

        let records = vec![
            VectorRecord::from_profile(&profile("DOC-00001", "Cardiology", "Boston, MA"), vec![1.0, 0.0]),
            VectorRecord::from_profile(&profile("DOC-00002", "Neurology", "Boston, MA"), vec![0.0, 1.0]),
            VectorRecord::from_profile(&profile("DOC-00003", "Cardiology", "Miami, FL"), vec![0.6, 0.8]),
        ];
        assert_eq!(store.upsert(&records).await.unwrap(), 3);
        assert_eq!(store.count().await.unwrap(), 3);

        let hits = store
            .query(&[1.0, 0.0], &SearchFilter::default(), 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "DOC-00001");
        assert!(hits[0].distance <= hits[1].distance);

        let filter = SearchFilter::new(Some("Boston, MA".into()), Some("Neurology".into()));
        let hits = store.query(&[1.0, 0.0], &filter, 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "DOC-00002");

        let fetched = store.get("DOC-00003").await.unwrap().unwrap();
        assert_eq!(fetched.metadata.location, "Miami, FL");
        assert_eq!(fetched.embedding.len(), 2);

        assert_eq!(
            store.ensure_schema(2, "test-model").await.unwrap(),
            SchemaStatus::Existing
        );
        assert!(matches!(
            store.ensure_schema(3, "test-model").await.unwrap(),
            SchemaStatus::Recreated { .. }
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
