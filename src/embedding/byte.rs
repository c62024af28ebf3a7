//! Deterministic byte-projection embedder.
//!
//! Projects the first `dims` UTF-8 bytes of the input onto a zero-padded
//! vector. Crude as a similarity signal, but total, deterministic, and free
//! of model downloads, which makes it the default provider and the workhorse
//! of the test suite.

use super::Embedder;

/// Byte-projection embedder with configurable dimensionality.
pub struct ByteEmbedder {
    dims: usize,
}

impl ByteEmbedder {
    pub fn new(dims: usize) -> Self {
        ByteEmbedder { dims }
    }
}

impl Embedder for ByteEmbedder {
    /// Cast the first `dims` encoded bytes to floats, zero-padding the rest.
    ///
    /// Whitespace-only text yields the all-zero vector. Texts that differ
    /// within their first `dims` bytes yield distinct vectors.
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dims];
        if text.trim().is_empty() {
            tracing::warn!("empty or whitespace-only text passed to embed()");
            return vec;
        }
        for (slot, byte) in vec.iter_mut().zip(text.as_bytes().iter().take(self.dims)) {
            *slot = f32::from(*byte);
        }
        vec
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length_matches_dims() {
        let embedder = ByteEmbedder::new(8);
        assert_eq!(embedder.embed("hello").len(), 8);
        assert_eq!(embedder.embed("a much longer input string").len(), 8);
    }

    #[test]
    fn test_deterministic() {
        let embedder = ByteEmbedder::new(16);
        assert_eq!(embedder.embed("deploy the app"), embedder.embed("deploy the app"));
    }

    #[test]
    fn test_distinct_texts_distinct_vectors() {
        let embedder = ByteEmbedder::new(16);
        assert_ne!(embedder.embed("alpha"), embedder.embed("omega"));
    }

    #[test]
    fn test_byte_values_and_padding() {
        let embedder = ByteEmbedder::new(4);
        let vec = embedder.embed("ab");
        assert_eq!(vec, vec![97.0, 98.0, 0.0, 0.0]);
    }

    #[test]
    fn test_truncates_past_dims() {
        let embedder = ByteEmbedder::new(2);
        assert_eq!(embedder.embed("abcd"), vec![97.0, 98.0]);
    }

    #[test]
    fn test_empty_text_zero_vector() {
        let embedder = ByteEmbedder::new(8);
        assert_eq!(embedder.embed(""), vec![0.0f32; 8]);
    }

    #[test]
    fn test_whitespace_only_zero_vector() {
        let embedder = ByteEmbedder::new(8);
        assert_eq!(embedder.embed("   \t\n  "), vec![0.0f32; 8]);
    }
}
