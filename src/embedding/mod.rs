//! Text-to-vector embedding capability.
//!
//! Provides the [`Embedder`] trait and two implementations: a deterministic
//! byte-projection baseline ([`byte::ByteEmbedder`]) and a sentence-embedding
//! model via ONNX Runtime ([`onnx::OnnxEmbedder`]). A provider is created
//! from configuration via [`create_embedder`].

pub mod byte;
pub mod onnx;

use crate::config::Config;
use crate::errors::Error;

/// Default embedding dimensions (bge-small-en-v1.5).
pub const EMBEDDING_DIMS: usize = 384;

/// Trait for embedding text into fixed-length vectors.
///
/// The contract is total and deterministic: identical text always yields an
/// identical vector of exactly `dims()` elements. Empty or whitespace-only
/// text maps to the all-zero vector, and so does any internal provider
/// failure (logged at `warn`) — `embed` itself never fails. The store relies
/// only on this contract, not on any particular embedding quality.
pub trait Embedder: Send + Sync {
    /// Embed a single text string into a vector of `dims()` elements.
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Return the number of dimensions this embedder produces.
    fn dims(&self) -> usize;
}

/// Create an embedding provider from config.
///
/// `"byte"` is the zero-setup baseline; `"onnx"` loads the configured
/// sentence-embedding model (downloaded to the HF Hub cache on first use).
pub fn create_embedder(config: &Config) -> Result<Box<dyn Embedder>, Error> {
    match config.embedding_provider.as_str() {
        "byte" => Ok(Box::new(byte::ByteEmbedder::new(config.embedding_dims))),
        "onnx" => {
            let embedder = onnx::OnnxEmbedder::new(&config.embedding_model)?;
            Ok(Box::new(embedder))
        }
        other => Err(Error::Config(format!(
            "unknown embedding provider: {other}. Supported: byte, onnx"
        ))),
    }
}
