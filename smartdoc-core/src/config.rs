use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct SmartDocConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub name: String,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "smartdoc".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// `postgres` (pgvector) or `memory`.
    #[serde(default = "default_store_backend")]
    pub backend: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_store_backend() -> String {
    "postgres".to_string()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// `onnx`, `openai` or `hashing`.
    pub backend: String,
    #[serde(default)]
    pub onnx_model_path: String,
    #[serde(default = "default_onnx_dimensions")]
    pub onnx_dimensions: u32,
    #[serde(default = "default_api_model")]
    pub api_model: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_onnx_dimensions")]
    pub api_dimensions: u32,
    #[serde(default = "default_onnx_dimensions")]
    pub hashing_dimensions: u32,
}

fn default_onnx_dimensions() -> u32 {
    384
}

fn default_api_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    pub data_file: String,
    pub sample_file: String,
    pub num_doctors: usize,
    pub batch_size: usize,
    pub seed: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_file: "doctors_data.json".to_string(),
            sample_file: "doctors_sample.json".to_string(),
            num_doctors: 5000,
            batch_size: 100,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    pub default_n_results: u32,
    pub max_n_results: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_n_results: 5,
            max_n_results: 20,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub enabled: bool,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            max_tokens: 800,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: "static".to_string(),
        }
    }
}

impl SmartDocConfig {
    /// Load from a TOML file, with `SMARTDOC__SECTION__KEY` environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("SMARTDOC").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}
