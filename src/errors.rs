//! Error types for recall.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for recall operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot file exists but cannot be used (corrupt, wrong version,
    /// or internally inconsistent).
    #[error("Unusable snapshot {path}: {reason}")]
    Snapshot { path: PathBuf, reason: String },

    /// Tokenization error.
    #[error("Tokenization error: {0}")]
    Tokenization(#[from] tokenizers::Error),

    /// ONNX session error.
    #[error("ONNX session error: {0}")]
    Onnx(#[from] ort::Error),

    /// ONNX inference error.
    #[error("Inference error: {0}")]
    Inference(String),

    /// HuggingFace Hub error.
    #[error("HuggingFace Hub error: {0}")]
    HfHub(#[from] hf_hub::api::sync::ApiError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
