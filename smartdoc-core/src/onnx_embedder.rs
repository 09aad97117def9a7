//! Local sentence embeddings with `all-MiniLM-L6-v2` on ONNX Runtime.
//!
//! Tokenization uses the HuggingFace `tokenizers` export that ships with the
//! model; the token embeddings are mean-pooled under the attention mask and
//! L2-normalized, matching the sentence-transformers pipeline the vectors in
//! the store were produced with.

use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};

use crate::embeddings::{EmbeddingBackend, EmbeddingError, OnnxConfig};

pub const ONNX_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Sequence length the model was trained with; longer profiles are truncated.
const MAX_SEQUENCE_LENGTH: usize = 256;

pub struct OnnxEmbeddingClient {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    dimensions: usize,
}

impl std::fmt::Debug for OnnxEmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingClient")
            .field("model", &ONNX_MODEL_NAME)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingClient {
    /// Returns `EmbeddingError::ModelNotFound` if the model or tokenizer file is missing.
    pub fn new(config: OnnxConfig) -> Result<Self, EmbeddingError> {
        for path in [&config.model_path, &config.tokenizer_path] {
            if !path.exists() {
                return Err(EmbeddingError::ModelNotFound {
                    path: path.display().to_string(),
                });
            }
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(&config.model_path))
            .map_err(|e| EmbeddingError::OnnxInference(e.to_string()))?;

        let mut tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        tracing::info!(
            model = %config.model_path.display(),
            dimensions = config.dimensions,
            "Loaded ONNX embedding model"
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            dimensions: config.dimensions,
        })
    }

    /// Runs all texts inside one blocking task so a batch holds the session lock once.
    async fn run_blocking(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let dimensions = self.dimensions;

        tokio::task::spawn_blocking(move || {
            let mut guard = session
                .lock()
                .map_err(|e| EmbeddingError::OnnxInference(format!("session lock poisoned: {e}")))?;
            texts
                .iter()
                .map(|text| embed_sync(&mut guard, &tokenizer, text, dimensions))
                .collect()
        })
        .await
        .map_err(|e| EmbeddingError::OnnxInference(format!("spawn_blocking join error: {e}")))?
    }
}

#[async_trait]
impl EmbeddingBackend for OnnxEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.run_blocking(vec![text.to_string()])
            .await?
            .pop()
            .ok_or(EmbeddingError::MissingEmbedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.run_blocking(texts.to_vec()).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "onnx"
    }

    fn model(&self) -> &str {
        ONNX_MODEL_NAME
    }
}

fn embed_sync(
    session: &mut Session,
    tokenizer: &Tokenizer,
    text: &str,
    expected_dims: usize,
) -> Result<Vec<f32>, EmbeddingError> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

    let to_i64 = |values: &[u32]| values.iter().map(|&v| v as i64).collect::<Vec<i64>>();
    let input_ids = to_i64(encoding.get_ids());
    let attention_mask = to_i64(encoding.get_attention_mask());
    let token_type_ids = to_i64(encoding.get_type_ids());

    let shape = vec![1i64, input_ids.len() as i64];
    let onnx_err = |e: ort::Error| EmbeddingError::OnnxInference(e.to_string());

    let input_ids_tensor = Tensor::from_array((shape.clone(), input_ids)).map_err(onnx_err)?;
    let attention_mask_tensor =
        Tensor::from_array((shape.clone(), attention_mask.clone())).map_err(onnx_err)?;
    let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids)).map_err(onnx_err)?;

    let inputs = ort::inputs! {
        "input_ids" => input_ids_tensor,
        "attention_mask" => attention_mask_tensor,
        "token_type_ids" => token_type_ids_tensor,
    };

    let outputs = session.run(inputs).map_err(onnx_err)?;

    // last_hidden_state: [1, seq_len, hidden]
    let (out_shape, data) = outputs[0]
        .try_extract_tensor::<f32>()
        .map_err(onnx_err)?;
    if out_shape.len() != 3 {
        return Err(EmbeddingError::OnnxInference(format!(
            "Expected 3D output, got {}D",
            out_shape.len()
        )));
    }
    let seq_len = out_shape[1] as usize;
    let hidden = out_shape[2] as usize;

    let pooled = normalize(mean_pool(data, &attention_mask, seq_len, hidden));

    if pooled.len() != expected_dims {
        return Err(EmbeddingError::InvalidDimensions {
            expected: expected_dims,
            actual: pooled.len(),
        });
    }

    Ok(pooled)
}

/// Average token vectors where the attention mask is set.
fn mean_pool(data: &[f32], mask: &[i64], seq_len: usize, hidden: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; hidden];
    let mut count = 0.0f32;

    for (tok, row) in data.chunks_exact(hidden).take(seq_len).enumerate() {
        if mask.get(tok).copied().unwrap_or(0) == 0 {
            continue;
        }
        count += 1.0;
        for (acc, v) in pooled.iter_mut().zip(row) {
            *acc += v;
        }
    }

    if count > 0.0 {
        for v in &mut pooled {
            *v /= count;
        }
    }
    pooled
}

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// `$XDG_DATA_HOME/smartdoc/models`, falling back to `~/.local/share`.
pub fn default_model_dir() -> PathBuf {
    let data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local/share")
        });
    data_home.join("smartdoc/models")
}

/// Model and tokenizer paths. The tokenizer sits next to the model as
/// `<stem>-tokenizer.json`; an empty setting selects the default directory.
pub fn resolve_onnx_paths(onnx_model_path: &str) -> (PathBuf, PathBuf) {
    let model = if onnx_model_path.is_empty() {
        default_model_dir().join(format!("{ONNX_MODEL_NAME}.onnx"))
    } else {
        PathBuf::from(onnx_model_path)
    };
    let stem = model
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let tokenizer = model.with_file_name(format!("{stem}-tokenizer.json"));
    (model, tokenizer)
}
