//! Embedding backends for SmartDoc
//!
//! Provides an `EmbeddingBackend` trait with implementations for:
//! - **ONNX**: local `all-MiniLM-L6-v2` inference (384-dim), see `onnx_embedder`
//! - **OpenAI**: any OpenAI-compatible `/embeddings` endpoint
//! - **Hashing**: deterministic feature hashing, offline development and tests

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

/// Default ONNX (all-MiniLM-L6-v2) embedding dimensions
pub const ONNX_DIMENSIONS: usize = 384;

/// Model name recorded in the schema table for the hashing backend.
pub const HASHING_MODEL: &str = "fnv1a-feature-hashing";

// ============================================================================
// EmbeddingBackend trait
// ============================================================================

/// Abstraction over embedding providers.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a single document text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a patient query. Defaults to `embed()`.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(text).await
    }

    /// Embed many texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Model identifier, persisted alongside the vectors.
    fn model(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Invalid response: expected {expected} dimensions, got {actual}")]
    InvalidDimensions { expected: usize, actual: usize },

    #[error("Missing embedding in response")]
    MissingEmbedding,

    #[error("Missing API key (set EMBEDDING_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("All {attempts} retry attempts failed")]
    RetryExhausted { attempts: usize },

    #[error("ONNX model not found at {path}")]
    ModelNotFound { path: String },

    #[error("ONNX inference error: {0}")]
    OnnxInference(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Unknown embedding backend: {0}")]
    UnknownBackend(String),
}

impl EmbeddingError {
    /// Network failures, rate limits and 5xx responses are worth retrying.
    fn is_transient(&self) -> bool {
        match self {
            EmbeddingError::Http(_) => true,
            EmbeddingError::Api { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

// ============================================================================
// Config types
// ============================================================================

/// OpenAI-compatible embedding API configuration
#[derive(Debug, Clone)]
pub struct ApiEmbeddingConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub dimensions: usize,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl ApiEmbeddingConfig {
    /// Falls back to `EMBEDDING_API_KEY`, then `OPENAI_API_KEY`, when no key is given.
    pub fn new(api_key: Option<String>, model: String, base_url: String, dimensions: usize) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("EMBEDDING_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_default();

        Self {
            api_key,
            model,
            base_url,
            dimensions,
            max_retries: 3,
            retry_delay_ms: 500,
        }
    }
}

/// ONNX backend configuration
#[derive(Debug, Clone)]
pub struct OnnxConfig {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub dimensions: usize,
}

/// Configuration union for the backend factory.
pub enum BackendConfig {
    Onnx(OnnxConfig),
    OpenAi(ApiEmbeddingConfig),
    Hashing { dimensions: usize },
}

/// Create the appropriate backend from configuration.
pub fn create_backend(config: BackendConfig) -> Result<Box<dyn EmbeddingBackend>, EmbeddingError> {
    match config {
        BackendConfig::Onnx(c) => Ok(Box::new(crate::onnx_embedder::OnnxEmbeddingClient::new(c)?)),
        BackendConfig::OpenAi(c) => Ok(Box::new(OpenAiEmbeddingClient::new(c)?)),
        BackendConfig::Hashing { dimensions } => {
            Ok(Box::new(HashingEmbeddingClient::new(dimensions)))
        }
    }
}

/// Build the backend selected by `[embedding] backend` (`onnx`, `openai` or `hashing`).
pub fn create_backend_from_config(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingBackend>, EmbeddingError> {
    let backend_cfg = match config.backend.as_str() {
        "onnx" => {
            let (model_path, tokenizer_path) =
                crate::onnx_embedder::resolve_onnx_paths(&config.onnx_model_path);
            BackendConfig::Onnx(OnnxConfig {
                model_path,
                tokenizer_path,
                dimensions: config.onnx_dimensions as usize,
            })
        }
        "openai" => BackendConfig::OpenAi(ApiEmbeddingConfig::new(
            None,
            config.api_model.clone(),
            config.api_base_url.clone(),
            config.api_dimensions as usize,
        )),
        "hashing" => BackendConfig::Hashing {
            dimensions: config.hashing_dimensions as usize,
        },
        other => return Err(EmbeddingError::UnknownBackend(other.to_string())),
    };

    create_backend(backend_cfg)
}

// ============================================================================
// OpenAI API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// OpenAiEmbeddingClient
// ============================================================================

#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingClient {
    client: Client,
    config: ApiEmbeddingConfig,
}

impl OpenAiEmbeddingClient {
    pub fn new(config: ApiEmbeddingConfig) -> Result<Self, EmbeddingError> {
        if config.api_key.is_empty() {
            return Err(EmbeddingError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client against a custom base URL (local gateways, tests).
    pub fn with_base_url(
        mut config: ApiEmbeddingConfig,
        base_url: String,
    ) -> Result<Self, EmbeddingError> {
        config.base_url = base_url;
        Self::new(config)
    }

    /// Embed a batch with retries on transient failures.
    pub async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let retry_strategy = ExponentialBackoff::from_millis(self.config.retry_delay_ms)
            .max_delay(Duration::from_secs(10))
            .map(jitter)
            .take(self.config.max_retries);

        let result = RetryIf::spawn(
            retry_strategy,
            || self.embed_once(texts),
            EmbeddingError::is_transient,
        )
        .await;

        match result {
            Ok(vectors) => Ok(vectors),
            Err(e) if e.is_transient() => {
                tracing::error!(
                    attempts = self.config.max_retries,
                    error = %e,
                    "All embedding retry attempts failed"
                );
                Err(EmbeddingError::RetryExhausted {
                    attempts: self.config.max_retries,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn embed_once(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            dimensions: self.config.dimensions,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or(error_body);
            let code = status.as_u16();

            tracing::warn!(code = code, message = %message, "Embedding API error");

            return Err(EmbeddingError::Api { code, message });
        }

        let mut body: EmbeddingResponse = response.json().await?;
        if body.data.len() != texts.len() {
            return Err(EmbeddingError::MissingEmbedding);
        }
        body.data.sort_by_key(|d| d.index);

        body.data
            .into_iter()
            .map(|d| {
                if d.embedding.len() != self.config.dimensions {
                    Err(EmbeddingError::InvalidDimensions {
                        expected: self.config.dimensions,
                        actual: d.embedding.len(),
                    })
                } else {
                    Ok(d.embedding)
                }
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_texts(&[text.to_string()])
            .await?
            .pop()
            .ok_or(EmbeddingError::MissingEmbedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.embed_texts(texts).await
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// HashingEmbeddingClient
// ============================================================================

/// Deterministic bag-of-words embedder.
///
/// Each lowercase alphanumeric token is hashed (FNV-1a) into a signed bucket;
/// the result is L2-normalized. Texts sharing vocabulary end up close under
/// cosine distance, which is enough to exercise filtering and ranking without
/// a model on disk.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingClient {
    dimensions: usize,
}

impl HashingEmbeddingClient {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(&token.to_lowercase());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

fn fnv1a(token: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    token.bytes().fold(OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

#[async_trait]
impl EmbeddingBackend for HashingEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }

    fn model(&self) -> &str {
        HASHING_MODEL
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DIMS: usize = 8;

    fn test_config(api_key: &str) -> ApiEmbeddingConfig {
        ApiEmbeddingConfig {
            api_key: api_key.to_string(),
            model: "text-embedding-3-small".to_string(),
            base_url: "http://unused".to_string(),
            dimensions: DIMS,
            max_retries: 3,
            retry_delay_ms: 10,
        }
    }

    fn vector(seed: f32) -> Vec<f32> {
        (0..DIMS).map(|i| seed + i as f32 / 100.0).collect()
    }

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_embed_calls_api_with_bearer_token() {
        let mock_server = MockServer::start().await;
        let client = OpenAiEmbeddingClient::with_base_url(test_config("sk-test"), mock_server.uri())
            .expect("Failed to create client");

        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "text-embedding-3-small",
                "input": ["chest pain"],
                "dimensions": DIMS
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "embedding": vector(0.5), "index": 0 }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let embedding = client.embed("chest pain").await.unwrap();
        assert_eq!(embedding, vector(0.5));
    }

    #[tokio::test]
    async fn test_batch_is_reordered_by_index() {
        let mock_server = MockServer::start().await;
        let client = OpenAiEmbeddingClient::with_base_url(test_config("sk-test"), mock_server.uri())
            .unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "embedding": vector(2.0), "index": 1 },
                    { "embedding": vector(1.0), "index": 0 }
                ]
            })))
            .mount(&mock_server)
            .await;

        let texts = vec!["first".to_string(), "second".to_string()];
        let vectors = client.embed_batch(&texts).await.unwrap();
        assert_eq!(vectors, vec![vector(1.0), vector(2.0)]);
    }

    #[tokio::test]
    async fn test_server_error_exhausts_retries() {
        let mock_server = MockServer::start().await;
        let client = OpenAiEmbeddingClient::with_base_url(test_config("sk-test"), mock_server.uri())
            .unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": { "message": "Internal server error" }
            })))
            .mount(&mock_server)
            .await;

        match client.embed("hello").await {
            Err(EmbeddingError::RetryExhausted { attempts }) => assert_eq!(attempts, 3),
            other => panic!("Expected RetryExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retries_on_429_then_succeeds() {
        let mock_server = MockServer::start().await;
        let client = OpenAiEmbeddingClient::with_base_url(test_config("sk-test"), mock_server.uri())
            .unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded" }
            })))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "embedding": vector(0.1), "index": 0 }]
            })))
            .mount(&mock_server)
            .await;

        assert_eq!(client.embed("hello").await.unwrap().len(), DIMS);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mock_server = MockServer::start().await;
        let client = OpenAiEmbeddingClient::with_base_url(test_config("sk-bad"), mock_server.uri())
            .unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Incorrect API key provided" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        match client.embed("hello").await {
            Err(EmbeddingError::Api { code, message }) => {
                assert_eq!(code, 401);
                assert!(message.contains("Incorrect API key"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_dimensions_rejected() {
        let mock_server = MockServer::start().await;
        let client = OpenAiEmbeddingClient::with_base_url(test_config("sk-test"), mock_server.uri())
            .unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "embedding": [0.1, 0.2, 0.3], "index": 0 }]
            })))
            .mount(&mock_server)
            .await;

        match client.embed("hello").await {
            Err(EmbeddingError::InvalidDimensions { expected, actual }) => {
                assert_eq!(expected, DIMS);
                assert_eq!(actual, 3);
            }
            other => panic!("Expected InvalidDimensions, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_api_key() {
        match OpenAiEmbeddingClient::new(test_config("")) {
            Err(EmbeddingError::MissingApiKey) => {}
            other => panic!("Expected MissingApiKey, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_hashing_is_deterministic_and_normalized() {
        let backend = HashingEmbeddingClient::new(64);
        let a = backend.embed("Cardiology specialist in Boston").await.unwrap();
        let b = backend.embed("Cardiology specialist in Boston").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_prefers_shared_vocabulary() {
        let backend = HashingEmbeddingClient::new(384);
        let query = backend.embed_sync("severe chest pain cardiology");
        let near = backend.embed_sync("Cardiology specialist treating chest pain");
        let far = backend.embed_sync("Dermatology specialist treating acne");
        assert!(dot(&query, &near) > dot(&query, &far));
    }

    #[test]
    fn test_hashing_empty_text_is_zero_vector() {
        let backend = HashingEmbeddingClient::new(16);
        assert!(backend.embed_sync("   ").iter().all(|v| *v == 0.0));
    }

    fn embedding_settings(backend: &str) -> crate::config::EmbeddingConfig {
        crate::config::EmbeddingConfig {
            backend: backend.to_string(),
            onnx_model_path: "/nonexistent/all-MiniLM-L6-v2.onnx".to_string(),
            onnx_dimensions: 384,
            api_model: "text-embedding-3-small".to_string(),
            api_base_url: "http://localhost:1".to_string(),
            api_dimensions: 384,
            hashing_dimensions: 48,
        }
    }

    #[test]
    fn test_create_backend_from_config() {
        let backend = create_backend_from_config(&embedding_settings("hashing")).unwrap();
        assert_eq!(backend.dimensions(), 48);

        assert!(matches!(
            create_backend_from_config(&embedding_settings("onnx")),
            Err(EmbeddingError::ModelNotFound { .. })
        ));
        assert!(matches!(
            create_backend_from_config(&embedding_settings("word2vec")),
            Err(EmbeddingError::UnknownBackend(name)) if name == "word2vec"
        ));
    }

    #[tokio::test]
    async fn test_create_backend_hashing() {
        let backend = create_backend(BackendConfig::Hashing { dimensions: 32 }).unwrap();
        assert_eq!(backend.name(), "hashing");
        assert_eq!(backend.dimensions(), 32);
        assert_eq!(backend.model(), HASHING_MODEL);

        let texts = vec!["a b".to_string(), "c d".to_string()];
        assert_eq!(backend.embed_batch(&texts).await.unwrap().len(), 2);
    }
}
