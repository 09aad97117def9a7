//! Startup data preparation: make sure a dataset exists and the collection
//! holds vectors for the running embedding model before serving traffic.

use anyhow::{Context, Result};
use std::path::Path;

use smartdoc_core::config::IngestConfig;
use smartdoc_core::{EmbeddingBackend, SchemaStatus, VectorStore};
use smartdoc_ingest::dataset::{load_profiles, write_dataset, DatasetStats};
use smartdoc_ingest::{generate_profiles, ingest_profiles, IngestReport};

#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// True when the dataset file was missing and had to be generated.
    pub generated: bool,
    pub schema: SchemaStatus,
    pub ingested: Option<IngestReport>,
    pub count: usize,
}

pub async fn prepare(
    settings: &IngestConfig,
    embedder: &dyn EmbeddingBackend,
    store: &dyn VectorStore,
) -> Result<BootstrapReport> {
    let data_file = Path::new(&settings.data_file);

    let generated = !data_file.exists();
    if generated {
        tracing::info!(
            path = %data_file.display(),
            count = settings.num_doctors,
            "Dataset missing, generating"
        );
        let profiles = generate_profiles(settings.num_doctors, settings.seed);
        write_dataset(data_file, &settings.sample_file, &profiles)?;
        DatasetStats::from_profiles(&profiles).log();
    }

    let schema = store
        .ensure_schema(embedder.dimensions(), embedder.model())
        .await?;
    if let SchemaStatus::Recreated { reason } = &schema {
        tracing::warn!(%reason, "Collection rebuilt");
    }

    let existing = store.count().await?;
    let ingested = if schema.needs_ingest() || existing == 0 {
        let profiles = load_profiles(data_file)
            .with_context(|| format!("reading {}", data_file.display()))?;
        Some(ingest_profiles(&profiles, embedder, store, settings.batch_size).await?)
    } else {
        tracing::info!(count = existing, "Collection already populated");
        None
    };

    Ok(BootstrapReport {
        generated,
        schema,
        ingested,
        count: store.count().await?,
    })
}
