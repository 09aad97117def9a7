use clap::Parser;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use smartdoc_core::{
    create_backend_from_config, open_store, ChatBackend, ChatConfig, EmbeddingBackend,
    OpenAiChatClient, SmartDocConfig,
};
use smartdoc_server::http::{start_http_server, AppState};
use smartdoc_server::{bootstrap, RagService};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "smartdoc.toml")]
    config: String,

    /// Check database connectivity and exit
    #[arg(long)]
    health: bool,

    /// Serve whatever the collection already holds
    #[arg(long)]
    skip_bootstrap: bool,
}

async fn health(config: &SmartDocConfig) -> anyhow::Result<()> {
    if config.database.backend == "memory" {
        println!("✅ In-memory vector store configured (nothing to check)");
        return Ok(());
    }

    let pool = match smartdoc_core::db::connect(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            println!("❌ PostgreSQL connection failed: {}", e);
            std::process::exit(1);
        }
    };

    match smartdoc_core::db::report(&pool).await {
        Ok(report) => {
            println!("✅ PostgreSQL connected: {}", report.postgresql);
            match report.pgvector {
                Some(v) => println!("✅ pgvector version: {}", v),
                None => {
                    println!("❌ pgvector extension not installed");
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            println!("❌ Database check failed: {}", e);
            std::process::exit(1);
        }
    }

    println!("✅ SmartDoc DB health check passed");
    Ok(())
}

/// The LLM is used only when enabled in config and `OPENAI_API_KEY` is set.
fn chat_backend(config: &SmartDocConfig) -> Option<Arc<dyn ChatBackend>> {
    if !config.llm.enabled {
        tracing::info!("LLM disabled in config, using templated explanations");
        return None;
    }
    match OpenAiChatClient::new(ChatConfig::from_settings(&config.llm)) {
        Ok(client) => {
            tracing::info!(model = %config.llm.model, "LLM explanations enabled");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("LLM unavailable ({}), using templated explanations", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
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

    if args.health {
        return health(&config).await;
    }

    let store = match open_store(&config.database).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open vector store: {}", e);
            std::process::exit(1);
        }
    };

    let embedder: Arc<dyn EmbeddingBackend> =
        match create_backend_from_config(&config.embedding) {
            Ok(b) => Arc::from(b),
            Err(e) => {
                eprintln!("Failed to create embedding backend: {}", e);
                std::process::exit(1);
            }
        };
    tracing::info!(
        backend = embedder.name(),
        model = embedder.model(),
        dimensions = embedder.dimensions(),
        store = store.name(),
        "Services constructed"
    );

    if args.skip_bootstrap {
        tracing::info!("Bootstrap skipped");
    } else {
        let report = bootstrap::prepare(&config.ingest, embedder.as_ref(), store.as_ref()).await?;
        tracing::info!(
            generated = report.generated,
            ingested = report.ingested.is_some(),
            count = report.count,
            "Bootstrap complete"
        );
    }

    let state = Arc::new(AppState {
        rag: RagService::new(embedder, store, chat_backend(&config)),
        retrieval: config.retrieval.clone(),
    });

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    start_http_server(state, config.http.clone(), tx.subscribe()).await
}
