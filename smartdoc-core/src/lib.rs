pub mod analysis;
pub mod catalog;
pub mod config;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod llm;
pub mod models;
pub mod onnx_embedder;
pub mod store;

pub use config::SmartDocConfig;
pub use embeddings::{
    create_backend, create_backend_from_config, ApiEmbeddingConfig, BackendConfig,
    EmbeddingBackend, EmbeddingError, HashingEmbeddingClient, OnnxConfig, OpenAiEmbeddingClient,
    ONNX_DIMENSIONS,
};
pub use error::SmartDocError;
pub use llm::{ChatBackend, ChatConfig, ChatMessage, LlmError, OpenAiChatClient, Role};
pub use models::{
    DoctorMetadata, DoctorProfile, ExplanationSource, PatientQueryResponse, Recommendation,
    ScoredRecord, SearchFilter, SearchMetadata, SearchResult, VectorRecord,
};
pub use onnx_embedder::OnnxEmbeddingClient;
pub use store::{
    open_store, InMemoryVectorStore, PgVectorStore, SchemaStatus, StoreError, VectorStore,
    SCHEMA_VERSION,
};
