//! Brute-force flat vector index over squared Euclidean distance.
//!
//! Positions correspond 1:1 with the memory store's record list by insertion
//! order; the index holds no text. Exact scan is fine at this scale (a few
//! hundred vectors), and callers depend only on the ordering contract below,
//! so an approximate structure could replace this without touching them.

/// Flat L2 vector index.
#[derive(Debug, Default)]
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        VectorIndex { vectors: Vec::new() }
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append a vector at the next position. Amortized O(1).
    pub fn add(&mut self, vector: Vec<f32>) {
        self.vectors.push(vector);
    }

    /// Drop all vectors, returning the index to empty state.
    pub fn reset(&mut self) {
        self.vectors.clear();
    }

    /// Replace all contents with the given ordered vectors.
    pub fn rebuild(&mut self, vectors: Vec<Vec<f32>>) {
        self.vectors = vectors;
    }

    /// Stored vectors in position order.
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Return up to `k` entries as `(position, squared_distance)`, sorted
    /// ascending by squared Euclidean distance to `query`.
    ///
    /// Ties break by ascending position, so the earlier (older) record wins
    /// and results are deterministic. Fewer than `k` stored vectors means all
    /// of them are returned; an empty index returns nothing.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, squared_distance(query, vector)))
            .collect();

        // total_cmp keeps the comparator total even if a vector carries NaN,
        // which would make partial_cmp inconsistent and can panic the sort.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        scored
    }
}

/// Squared Euclidean distance over the shorter of the two lengths.
///
/// Vectors stored through one embedder always share a dimensionality, so the
/// zip never truncates in practice.
fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
