//! Read-only views over a populated vector store: record dumps, pairwise
//! similarity, 2D projection and schema checks.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use smartdoc_core::analysis::{cosine_similarity, project_2d, VectorStats};
use smartdoc_core::{EmbeddingBackend, SchemaStatus, SearchFilter, SearchResult, VectorStore};

/// Number of leading and trailing components shown per vector.
pub const PREVIEW_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct RecordSummary {
    pub id: String,
    pub name: String,
    pub primary_specialty: String,
    pub location: String,
    pub stats: VectorStats,
    pub head: Vec<f32>,
    pub tail: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct InspectReport {
    pub total: usize,
    pub records: Vec<RecordSummary>,
}

pub async fn inspect(store: &dyn VectorStore, limit: usize) -> Result<InspectReport> {
    let total = store.count().await?;
    let records = store
        .fetch(limit)
        .await?
        .into_iter()
        .map(|r| {
            let n = r.embedding.len();
            RecordSummary {
                stats: VectorStats::of(&r.embedding),
                head: r.embedding[..n.min(PREVIEW_LEN)].to_vec(),
                tail: r.embedding[n.saturating_sub(PREVIEW_LEN)..].to_vec(),
                id: r.id,
                name: r.metadata.name,
                primary_specialty: r.metadata.primary_specialty,
                location: r.metadata.location,
            }
        })
        .collect();
    Ok(InspectReport { total, records })
}

#[derive(Debug, Clone)]
pub struct PairSimilarity {
    pub a: (String, String),
    pub b: (String, String),
    pub similarity: f32,
}

/// Cosine similarity of two stored vectors; defaults to the first two records.
pub async fn similarity(
    store: &dyn VectorStore,
    a: Option<&str>,
    b: Option<&str>,
) -> Result<PairSimilarity> {
    let (first, second) = match (a, b) {
        (Some(a), Some(b)) => {
            let first = store
                .get(a)
                .await?
                .with_context(|| format!("no vector stored for {a}"))?;
            let second = store
                .get(b)
                .await?
                .with_context(|| format!("no vector stored for {b}"))?;
            (first, second)
        }
        (None, None) => {
            let mut records = store.fetch(2).await?.into_iter();
            match (records.next(), records.next()) {
                (Some(first), Some(second)) => (first, second),
                _ => bail!("need at least two stored vectors"),
            }
        }
        _ => bail!("pass both --a and --b, or neither"),
    };

    Ok(PairSimilarity {
        similarity: cosine_similarity(&first.embedding, &second.embedding),
        a: (first.id, first.metadata.name),
        b: (second.id, second.metadata.name),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectedRow {
    pub doctor_id: String,
    pub name: String,
    pub primary_specialty: String,
    pub pc1: f64,
    pub pc2: f64,
}

#[derive(Debug, Clone)]
pub struct ProjectionReport {
    pub rows: Vec<ProjectedRow>,
    pub explained_variance_ratio: [f64; 2],
    /// Mean `(pc1, pc2)` per primary specialty.
    pub centroids: BTreeMap<String, [f64; 2]>,
}

pub async fn project(store: &dyn VectorStore, limit: usize) -> Result<ProjectionReport> {
    let records = store.fetch(limit).await?;
    let vectors: Vec<Vec<f32>> = records.iter().map(|r| r.embedding.clone()).collect();
    let projection = project_2d(&vectors)?;

    let rows: Vec<ProjectedRow> = records
        .into_iter()
        .zip(projection.points)
        .map(|(r, [pc1, pc2])| ProjectedRow {
            doctor_id: r.id,
            name: r.metadata.name,
            primary_specialty: r.metadata.primary_specialty,
            pc1,
            pc2,
        })
        .collect();

    let mut sums: BTreeMap<String, ([f64; 2], usize)> = BTreeMap::new();
    for row in &rows {
        let entry = sums.entry(row.primary_specialty.clone()).or_default();
        entry.0[0] += row.pc1;
        entry.0[1] += row.pc2;
        entry.1 += 1;
    }
    let centroids = sums
        .into_iter()
        .map(|(specialty, ([x, y], n))| (specialty, [x / n as f64, y / n as f64]))
        .collect();

    Ok(ProjectionReport {
        rows,
        explained_variance_ratio: projection.explained_variance_ratio,
        centroids,
    })
}

const PROJECTION_HEADER: [&str; 5] = ["doctor_id", "name", "primary_specialty", "pc1", "pc2"];

/// Write projected rows as CSV. The header is written even when `rows` is empty.
pub fn write_projection_csv(path: impl AsRef<Path>, rows: &[ProjectedRow]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(PROJECTION_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub store: String,
    pub status: SchemaStatus,
    pub count: usize,
}

/// Verify (or with `reset`, rebuild) the collection for the running embedder.
pub async fn check(
    store: &dyn VectorStore,
    embedder: &dyn EmbeddingBackend,
    reset: bool,
) -> Result<CheckReport> {
    if reset {
        store.reset().await?;
        tracing::warn!(store = store.name(), "Collection reset");
    }
    let status = store
        .ensure_schema(embedder.dimensions(), embedder.model())
        .await?;
    Ok(CheckReport {
        store: store.name().to_string(),
        count: store.count().await?,
        status,
    })
}

/// Direct store search, no LLM involved.
pub async fn query(
    store: &dyn VectorStore,
    embedder: &dyn EmbeddingBackend,
    text: &str,
    filter: &SearchFilter,
    n_results: usize,
) -> Result<Vec<SearchResult>> {
    let embedding = embedder.embed_query(text).await?;
    let hits = store.query(&embedding, filter, n_results).await?;
    Ok(hits.into_iter().map(SearchResult::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_profiles;
    use crate::pipeline::ingest_profiles;
    use smartdoc_core::{HashingEmbeddingClient, InMemoryVectorStore};

    async fn populated(count: usize) -> (InMemoryVectorStore, HashingEmbeddingClient) {
        let embedder = HashingEmbeddingClient::new(64);
        let store = InMemoryVectorStore::new();
        store.ensure_schema(64, embedder.model()).await.unwrap();
        let profiles = generate_profiles(count, Some(11));
        ingest_profiles(&profiles, &embedder, &store, 16).await.unwrap();
        (store, embedder)
    }

    #[tokio::test]
    async fn test_inspect_previews() {
        let (store, _) = populated(30).await;
        let report = inspect(&store, 5).await.unwrap();
        assert_eq!(report.total, 30);
        assert_eq!(report.records.len(), 5);
        let first = &report.records[0];
        assert_eq!(first.id, "DOC-00001");
        assert_eq!(first.stats.dimensions, 64);
        assert_eq!(first.head.len(), PREVIEW_LEN);
        assert_eq!(first.tail.len(), PREVIEW_LEN);
    }

    #[tokio::test]
    async fn test_similarity_defaults_and_explicit() {
        let (store, _) = populated(5).await;

        let pair = similarity(&store, None, None).await.unwrap();
        assert_eq!(pair.a.0, "DOC-00001");
        assert_eq!(pair.b.0, "DOC-00002");
        assert!((-1.0..=1.0).contains(&pair.similarity));

        let same = similarity(&store, Some("DOC-00003"), Some("DOC-00003")).await.unwrap();
        assert!((same.similarity - 1.0).abs() < 1e-5);

        assert!(similarity(&store, Some("DOC-00003"), None).await.is_err());
        assert!(similarity(&store, Some("DOC-99999"), Some("DOC-00001")).await.is_err());
    }

    #[tokio::test]
    async fn test_project_writes_csv() {
        let (store, _) = populated(40).await;
        let report = project(&store, 500).await.unwrap();
        assert_eq!(report.rows.len(), 40);
        assert!(report.explained_variance_ratio[0] >= report.explained_variance_ratio[1]);
        assert!(!report.centroids.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors_2d.csv");
        write_projection_csv(&path, &report.rows).unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("doctor_id,name,primary_specialty,pc1,pc2"));
        assert_eq!(lines.count(), 40);
    }

    #[tokio::test]
    async fn test_check_and_reset() {
        let (store, embedder) = populated(10).await;

        let report = check(&store, &embedder, false).await.unwrap();
        assert_eq!(report.status, SchemaStatus::Existing);
        assert_eq!(report.count, 10);

        let report = check(&store, &embedder, true).await.unwrap();
        assert_eq!(report.status, SchemaStatus::Created);
        assert_eq!(report.count, 0);
    }

    #[tokio::test]
    async fn test_query_filters_by_location() {
        let (store, embedder) = populated(60).await;
        let filter = SearchFilter::new(Some("Boston, MA".to_string()), None);
        let results = query(&store, &embedder, "heart surgery", &filter, 5).await.unwrap();
        assert!(results.len() <= 5);
        assert!(results.iter().all(|r| r.doctor.location == "Boston, MA"));
    }

    #[test]
    fn test_projection_csv_quotes_special_characters() {
        let rows = vec![
            ProjectedRow {
                doctor_id: "DOC-00001".to_string(),
                name: "Dr. A\rB".to_string(),
                primary_specialty: "Cardiology".to_string(),
                pc1: 0.5,
                pc2: -0.5,
            },
            ProjectedRow {
                doctor_id: "DOC-00002".to_string(),
                name: "Dr. \"Jo\", Smith".to_string(),
                primary_specialty: "Neurology".to_string(),
                pc1: 1.25,
                pc2: 0.0,
            },
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");
        write_projection_csv(&path, &rows).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("doctor_id,name,primary_specialty,pc1,pc2\n"));
        assert!(raw.contains("\"Dr. A\rB\""));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let names: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert_eq!(names, vec!["Dr. A\rB", "Dr. \"Jo\", Smith"]);
    }

    #[test]
    fn test_projection_csv_empty_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_projection_csv(&path, &[]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "doctor_id,name,primary_specialty,pc1,pc2\n"
        );
    }
}
