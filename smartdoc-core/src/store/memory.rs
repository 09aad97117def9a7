use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{schema_mismatch, SchemaStatus, StoreError, VectorStore, SCHEMA_VERSION};
use crate::analysis::cosine_similarity;
use crate::models::{ScoredRecord, SearchFilter, VectorRecord};

#[derive(Debug, Clone)]
struct Schema {
    version: i32,
    dimensions: usize,
    model: String,
}

#[derive(Debug, Default)]
struct Inner {
    schema: Option<Schema>,
    records: BTreeMap<String, VectorRecord>,
}

/// Non-persistent store: brute-force cosine scan over a sorted map.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    inner: RwLock<Inner>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_schema(
        &self,
        dimensions: usize,
        model: &str,
    ) -> Result<SchemaStatus, StoreError> {
        let mut inner = self.inner.write().await;
        let fresh = Schema {
            version: SCHEMA_VERSION,
            dimensions,
            model: model.to_string(),
        };

        let status = match &inner.schema {
            None => SchemaStatus::Created,
            Some(s) => match schema_mismatch((s.version, s.dimensions, &s.model), dimensions, model)
            {
                None => return Ok(SchemaStatus::Existing),
                Some(reason) => {
                    tracing::warn!(%reason, "In-memory collection schema changed, clearing");
                    SchemaStatus::Recreated { reason }
                }
            },
        };

        inner.records.clear();
        inner.schema = Some(fresh);
        Ok(status)
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let expected = inner
            .schema
            .as_ref()
            .map(|s| s.dimensions)
            .ok_or(StoreError::SchemaMissing)?;

        if let Some(bad) = records.iter().find(|r| r.embedding.len() != expected) {
            return Err(StoreError::DimensionMismatch {
                expected,
                actual: bad.embedding.len(),
            });
        }

        for record in records {
            inner.records.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn query(
        &self,
        embedding: &[f32],
        filter: &SearchFilter,
        n_results: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let inner = self.inner.read().await;
        if let Some(schema) = &inner.schema {
            if schema.dimensions != embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected: schema.dimensions,
                    actual: embedding.len(),
                });
            }
        }

        let mut hits: Vec<ScoredRecord> = inner
            .records
            .values()
            .filter(|r| filter.matches(&r.metadata))
            .map(|r| ScoredRecord {
                id: r.id.clone(),
                metadata: r.metadata.clone(),
                document: r.document.clone(),
                distance: 1.0 - f64::from(cosine_similarity(embedding, &r.embedding)),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(n_results);
        Ok(hits)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().await.records.len())
    }

    async fn fetch(&self, limit: usize) -> Result<Vec<VectorRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.records.values().take(limit).cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<VectorRecord>, StoreError> {
        Ok(self.inner.read().await.records.get(id).cloned())
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.records.clear();
        inner.schema = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::doctor::fixtures::profile;

    fn record(id: &str, specialty: &str, location: &str, embedding: Vec<f32>) -> VectorRecord {
        VectorRecord::from_profile(&profile(id, specialty, location), embedding)
    }

    async fn seeded() -> InMemoryVectorStore {
        let store = InMemoryVectorStore::new();
        store.ensure_schema(2, "test-model").await.unwrap();
        store
            .upsert(&[
                record("DOC-00001", "Cardiology", "Boston, MA", vec![1.0, 0.0]),
                record("DOC-00002", "Cardiology", "Miami, FL", vec![0.8, 0.6]),
                record("DOC-00003", "Neurology", "Boston, MA", vec![0.0, 1.0]),
                record("DOC-00004", "Neurology", "Miami, FL", vec![-1.0, 0.0]),
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_query_orders_by_ascending_distance() {
        let store = seeded().await;
        let hits = store
            .query(&[1.0, 0.0], &SearchFilter::default(), 10)
            .await
            .unwrap();

        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["DOC-00001", "DOC-00002", "DOC-00003", "DOC-00004"]);
        assert!(hits[0].distance.abs() < 1e-6);
        assert!((hits[3].distance - 2.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_query_respects_limit_and_filters() {
        let store = seeded().await;

        let hits = store.query(&[1.0, 0.0], &SearchFilter::default(), 2).await.unwrap();
        assert_eq!(hits.len(), 2);

        let by_location = SearchFilter::new(Some("Boston, MA".into()), None);
        let hits = store.query(&[1.0, 0.0], &by_location, 10).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.metadata.location == "Boston, MA"));

        let both = SearchFilter::new(Some("Miami, FL".into()), Some("Neurology".into()));
        let hits = store.query(&[1.0, 0.0], &both, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "DOC-00004");
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = seeded().await;
        store
            .upsert(&[record("DOC-00001", "Urology", "Boston, MA", vec![0.0, 1.0])])
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 4);
        let updated = store.get("DOC-00001").await.unwrap().unwrap();
        assert_eq!(updated.metadata.primary_specialty, "Urology");
    }

    #[tokio::test]
    async fn test_upsert_rejects_wrong_dimensions() {
        let store = seeded().await;
        let err = store
            .upsert(&[record("DOC-00009", "Urology", "Boston, MA", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }

    #[tokio::test]
    async fn test_upsert_without_schema_fails() {
        let store = InMemoryVectorStore::new();
        let err = store
            .upsert(&[record("DOC-00001", "Urology", "Boston, MA", vec![1.0, 0.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SchemaMissing));
    }

    #[tokio::test]
    async fn test_schema_lifecycle() {
        let store = seeded().await;

        let status = store.ensure_schema(2, "test-model").await.unwrap();
        assert_eq!(status, SchemaStatus::Existing);
        assert_eq!(store.count().await.unwrap(), 4);

        let status = store.ensure_schema(3, "test-model").await.unwrap();
        assert!(matches!(status, SchemaStatus::Recreated { .. }));
        assert_eq!(store.count().await.unwrap(), 0);

        store.reset().await.unwrap();
        let status = store.ensure_schema(3, "test-model").await.unwrap();
        assert_eq!(status, SchemaStatus::Created);
    }

    #[tokio::test]
    async fn test_fetch_is_ordered_by_id() {
        let store = seeded().await;
        let records = store.fetch(3).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["DOC-00001", "DOC-00002", "DOC-00003"]);
    }
}
