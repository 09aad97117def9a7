use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use smartdoc_core::{
    create_backend_from_config, open_store, EmbeddingBackend, SearchFilter, SmartDocConfig,
    VectorStore,
};
use smartdoc_ingest::dataset::{load_profiles, write_dataset, DatasetStats};
use smartdoc_ingest::{generate_profiles, ingest_profiles, inspect};

#[derive(Parser, Debug)]
#[command(name = "smartdoc-ingest", author, version, about = "SmartDoc offline data tools")]
struct Args {
    #[arg(short, long, default_value = "smartdoc.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the synthetic doctor dataset and its 10-profile sample
    Generate {
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Embed the dataset and upsert it into the vector store
    Embed {
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Search the store directly (no LLM)
    Query {
        text: String,
        #[arg(short = 'n', long, default_value_t = 5)]
        n_results: usize,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
    },
    /// Show stored vectors with summary statistics
    Inspect {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Cosine similarity between two stored vectors
    Similarity {
        #[arg(long)]
        a: Option<String>,
        #[arg(long)]
        b: Option<String>,
    },
    /// Project stored vectors to 2D with PCA and write a CSV
    Project {
        #[arg(long, default_value_t = 500)]
        limit: usize,
        #[arg(short, long, default_value = "vectors_2d.csv")]
        output: String,
    },
    /// Report schema status and record count
    Check {
        /// Drop and recreate the collection
        #[arg(long)]
        reset: bool,
    },
}

fn preview(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

async fn open(
    config: &SmartDocConfig,
) -> anyhow::Result<(Arc<dyn VectorStore>, Arc<dyn EmbeddingBackend>)> {
    let store = open_store(&config.database)
        .await
        .context("opening vector store")?;
    let embedder: Arc<dyn EmbeddingBackend> = Arc::from(
        create_backend_from_config(&config.embedding).context("creating embedding backend")?,
    );
    Ok((store, embedder))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match SmartDocConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Generate {
            count,
            seed,
            output,
        } => {
            let count = count.unwrap_or(config.ingest.num_doctors);
            let output = output.unwrap_or_else(|| config.ingest.data_file.clone());
            let profiles = generate_profiles(count, seed.or(config.ingest.seed));
            write_dataset(&output, &config.ingest.sample_file, &profiles)?;
            DatasetStats::from_profiles(&profiles).log();
            println!(
                "Wrote {} profiles to {} (sample: {})",
                profiles.len(),
                output,
                config.ingest.sample_file
            );
        }

        Command::Embed { input } => {
            let input = input.unwrap_or_else(|| config.ingest.data_file.clone());
            let profiles = load_profiles(&input).with_context(|| format!("reading {input}"))?;
            let (store, embedder) = open(&config).await?;

            let status = store
                .ensure_schema(embedder.dimensions(), embedder.model())
                .await?;
            tracing::info!(?status, "Collection schema");

            let report = ingest_profiles(
                &profiles,
                embedder.as_ref(),
                store.as_ref(),
                config.ingest.batch_size,
            )
            .await?;
            println!(
                "Embedded {} profiles in {} batches ({} dimensions); collection now holds {}",
                report.total,
                report.batches,
                report.dimensions,
                store.count().await?
            );
        }

        Command::Query {
            text,
            n_results,
            location,
            specialty,
        } => {
            let (store, embedder) = open(&config).await?;
            let filter = SearchFilter::new(location, specialty);
            let results =
                inspect::query(store.as_ref(), embedder.as_ref(), &text, &filter, n_results)
                    .await?;

            if results.is_empty() {
                println!("No doctors found matching your criteria.");
            }
            for (rank, r) in results.iter().enumerate() {
                println!(
                    "{}. {} ({}) - {} | {}, {} | {} years | similarity {:.4}",
                    rank + 1,
                    r.doctor.name,
                    r.doctor.doctor_id,
                    r.doctor.primary_specialty,
                    r.doctor.hospital_affiliation,
                    r.doctor.location,
                    r.doctor.years_of_experience,
                    r.similarity_score
                );
            }
        }

        Command::Inspect { limit } => {
            let (store, _) = open(&config).await?;
            let report = inspect::inspect(store.as_ref(), limit).await?;
            println!("Total vectors: {}", report.total);
            for r in &report.records {
                println!();
                println!("{} {} | {} | {}", r.id, r.name, r.primary_specialty, r.location);
                println!(
                    "  dimensions={} min={:.4} max={:.4} mean={:.4}",
                    r.stats.dimensions, r.stats.min, r.stats.max, r.stats.mean
                );
                println!("  first: {}", preview(&r.head));
                println!("  last:  {}", preview(&r.tail));
            }
        }

        Command::Similarity { a, b } => {
            let (store, _) = open(&config).await?;
            let pair = inspect::similarity(store.as_ref(), a.as_deref(), b.as_deref()).await?;
            println!(
                "cosine({} {}, {} {}) = {:.4}",
                pair.a.0, pair.a.1, pair.b.0, pair.b.1, pair.similarity
            );
        }

        Command::Project { limit, output } => {
            let (store, _) = open(&config).await?;
            let report = inspect::project(store.as_ref(), limit).await?;
            inspect::write_projection_csv(&output, &report.rows)?;

            let [pc1, pc2] = report.explained_variance_ratio;
            tracing::info!(pc1, pc2, "Explained variance ratio");
            for (specialty, [x, y]) in &report.centroids {
                tracing::info!(%specialty, pc1 = x, pc2 = y, "Specialty centroid");
            }
            println!("Wrote {} points to {}", report.rows.len(), output);
        }

        Command::Check { reset } => {
            let (store, embedder) = open(&config).await?;
            let report = inspect::check(store.as_ref(), embedder.as_ref(), reset).await?;
            println!(
                "store={} schema={:?} records={}",
                report.store, report.status, report.count
            );
        }
    }

    Ok(())
}
