//! Synchronous ONNX embedding provider.
//!
//! Runs a sentence-embedding model (bge-small-en-v1.5 by default, 384
//! dimensions) with mean pooling and L2 normalization. Model files come from
//! the HF Hub cache and are downloaded once on first use.

use std::sync::Mutex;

use hf_hub::api::sync::Api;
use ort::inputs;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};

use super::{EMBEDDING_DIMS, Embedder};
use crate::errors::Error;

/// ONNX embedding provider for synchronous text-to-vector conversion.
///
/// The session sits behind a `Mutex` because `ort` requires exclusive access
/// during `run()`; this keeps [`Embedder::embed`] a `&self` method.
pub struct OnnxEmbedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    requires_token_type_ids: bool,
}

impl OnnxEmbedder {
    /// Load model from cache or download on first use.
    ///
    /// Uses `hf_hub::api::sync::Api` with the ureq feature for blocking I/O,
    /// matching the crate's no-async policy.
    pub fn new(model_id: &str) -> Result<Self, Error> {
        let api = Api::new()?;
        let repo = api.model(model_id.to_string());

        let model_path = repo
            .get("onnx/model.onnx")
            .or_else(|_| repo.get("model.onnx"))?;
        let tokenizer_path = repo.get("tokenizer.json")?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length: 512,
                ..Default::default()
            }))?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .map_err(ort::Error::from)?
            .commit_from_file(&model_path)?;

        tracing::info!(model = %model_path.display(), "ONNX embedding model loaded");

        // Check if model requires token_type_ids input
        let requires_token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        Ok(OnnxEmbedder {
            session: Mutex::new(session),
            tokenizer,
            requires_token_type_ids,
        })
    }

    /// Run tokenization and inference, returning the pooled vector.
    ///
    /// Texts exceeding 512 tokens are silently truncated via tokenizer
    /// truncation.
    fn infer(&self, text: &str) -> Result<Vec<f32>, Error> {
        let encoding = self.tokenizer.encode(text, true)?;
        let input_ids = encoding.get_ids();
        let attention_mask = encoding.get_attention_mask();

        if input_ids.is_empty() {
            return Ok(vec![0.0f32; EMBEDDING_DIMS]);
        }

        let seq_len = input_ids.len();

        let input_ids_vec: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
        let attention_mask_vec: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();

        let input_ids_tensor = Tensor::from_array(([1usize, seq_len], input_ids_vec))?;
        let attention_mask_tensor = Tensor::from_array(([1usize, seq_len], attention_mask_vec))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference("embedding session mutex poisoned".to_string()))?;

        // Only include token_type_ids if the model requires it
        let outputs = if self.requires_token_type_ids {
            let token_type_ids_vec: Vec<i64> = vec![0i64; seq_len]; // Single sentence, all zeros
            let token_type_ids_tensor =
                Tensor::from_array(([1usize, seq_len], token_type_ids_vec))?;
            session.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])?
        } else {
            session.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            ])?
        };

        let last_hidden_state = outputs
            .get("last_hidden_state")
            .or_else(|| outputs.get("token_embeddings"))
            .ok_or_else(|| {
                Error::Inference(
                    "Output tensor 'last_hidden_state' or 'token_embeddings' not found".to_string(),
                )
            })?
            .try_extract_tensor::<f32>()?;

        let (shape, data) = last_hidden_state;
        if shape.len() != 3 {
            return Err(Error::Inference(format!(
                "Expected 3D output (batch, seq_len, hidden), got {:?}",
                shape
            )));
        }

        let batch_size = shape[0] as usize;
        let hidden_dim = shape[2] as usize;

        if batch_size != 1 || hidden_dim != EMBEDDING_DIMS {
            return Err(Error::Inference(format!(
                "Unexpected output shape: {:?}, batch=1, hidden={} expected",
                shape, EMBEDDING_DIMS
            )));
        }

        let mut pooled = vec![0.0f32; EMBEDDING_DIMS];

        for (token_idx, chunk) in data.chunks(hidden_dim).take(seq_len).enumerate() {
            let mask_value = attention_mask.get(token_idx).copied().unwrap_or(0) as f32;

            for (dim, pooled_value) in pooled.iter_mut().enumerate() {
                *pooled_value += chunk[dim] * mask_value;
            }
        }

        let mask_sum: f32 = attention_mask
            .iter()
            .take(seq_len)
            .map(|&m| m as f32)
            .sum::<f32>()
            .max(1e-9);

        for value in pooled.iter_mut() {
            *value /= mask_sum;
        }

        Ok(l2_normalize(&pooled))
    }
}

impl Embedder for OnnxEmbedder {
    /// Generate an L2-normalized 384-dimensional embedding.
    ///
    /// Empty text yields the zero vector, and so does any inference failure:
    /// the store treats embedding as best-effort, so errors degrade rather
    /// than propagate.
    fn embed(&self, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            tracing::warn!("empty or whitespace-only text passed to embed()");
            return vec![0.0f32; EMBEDDING_DIMS];
        }
        match self.infer(text) {
            Ok(vec) => vec,
            Err(e) => {
                tracing::warn!(error = %e, "embedding inference failed, using zero vector");
                vec![0.0f32; EMBEDDING_DIMS]
            }
        }
    }

    fn dims(&self) -> usize {
        EMBEDDING_DIMS
    }
}

fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    let norm = norm.max(1e-9);

    vec.iter().map(|&x| x / norm).collect()
}
