use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::llm::LlmError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SmartDocError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Other error: {0}")]
    Other(String),
}
