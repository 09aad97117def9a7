//! Batch embedding of doctor profiles into a vector store.

use thiserror::Error;

use smartdoc_core::{DoctorProfile, EmbeddingBackend, EmbeddingError, StoreError, VectorRecord, VectorStore};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("batch_size must be greater than zero")]
    InvalidBatchSize,

    #[error("batch {batch} (records {start}..{end}): embedding failed: {source}")]
    Embedding {
        batch: usize,
        start: usize,
        end: usize,
        #[source]
        source: EmbeddingError,
    },

    #[error("batch {batch}: backend returned {actual} vectors for {expected} texts")]
    VectorCount {
        batch: usize,
        expected: usize,
        actual: usize,
    },

    #[error("batch {batch} (records {start}..{end}): store write failed: {source}")]
    Store {
        batch: usize,
        start: usize,
        end: usize,
        #[source]
        source: StoreError,
    },
}

impl IngestError {
    /// Zero-based index of the batch that failed, if any.
    pub fn batch(&self) -> Option<usize> {
        match self {
            IngestError::InvalidBatchSize => None,
            IngestError::Embedding { batch, .. }
            | IngestError::VectorCount { batch, .. }
            | IngestError::Store { batch, .. } => Some(*batch),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub total: usize,
    pub batches: usize,
    pub dimensions: usize,
}

/// Embed and upsert `profiles` in batches of `batch_size`.
///
/// The first failing batch aborts the run; batches after it are never
/// embedded or written.
pub async fn ingest_profiles(
    profiles: &[DoctorProfile],
    embedder: &dyn EmbeddingBackend,
    store: &dyn VectorStore,
    batch_size: usize,
) -> Result<IngestReport, IngestError> {
    if batch_size == 0 {
        return Err(IngestError::InvalidBatchSize);
    }

    let total_batches = profiles.len().div_ceil(batch_size);
    tracing::info!(
        total = profiles.len(),
        batch_size,
        batches = total_batches,
        backend = embedder.name(),
        store = store.name(),
        "Starting ingestion"
    );

    let mut written = 0;
    for (batch, chunk) in profiles.chunks(batch_size).enumerate() {
        let start = batch * batch_size;
        let end = start + chunk.len();

        let texts: Vec<String> = chunk.iter().map(DoctorProfile::embedding_text).collect();
        let vectors = embedder
            .embed_batch(&texts)
            .await
            .map_err(|source| IngestError::Embedding {
                batch,
                start,
                end,
                source,
            })?;

        if vectors.len() != chunk.len() {
            return Err(IngestError::VectorCount {
                batch,
                expected: chunk.len(),
                actual: vectors.len(),
            });
        }

        let records: Vec<VectorRecord> = chunk
            .iter()
            .zip(vectors)
            .map(|(profile, embedding)| VectorRecord::from_profile(profile, embedding))
            .collect();

        written += store
            .upsert(&records)
            .await
            .map_err(|source| IngestError::Store {
                batch,
                start,
                end,
                source,
            })?;

        tracing::info!(
            batch = batch + 1,
            of = total_batches,
            written,
            "Ingested batch"
        );
    }

    Ok(IngestReport {
        total: written,
        batches: total_batches,
        dimensions: embedder.dimensions(),
    })
}
