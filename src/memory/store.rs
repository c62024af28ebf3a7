//! Core memory store struct, insertion, and capacity eviction.

use crate::embedding::Embedder;
use crate::index::VectorIndex;

/// Default number of records retained before FIFO eviction.
pub const DEFAULT_CAPACITY: usize = 200;

/// Outcome of a [`MemoryStore::add`] call.
///
/// Invalid input is a reported no-op rather than an error: the store is a
/// best-effort memory aid, not a transactional one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Record was appended at `position`; `evicted` is true when the oldest
    /// record was dropped to make room.
    Added { position: usize, evicted: bool },
    /// Text was empty or whitespace-only and the store was left untouched.
    Skipped,
}

/// Bounded-capacity semantic memory store.
///
/// Owns an ordered record list (oldest first) and a [`VectorIndex`] holding
/// one vector per record at the matching position. After every completed
/// operation `records.len() == index.len() <= capacity`, and the vector at
/// position `i` embeds `records[i]`.
///
/// Mutating operations take `&mut self`, so the borrow checker enforces the
/// single-writer model: searches may share the store, but never interleave
/// with a mutation.
pub struct MemoryStore {
    pub(crate) records: Vec<String>,
    pub(crate) index: VectorIndex,
    pub(crate) embedder: Box<dyn Embedder>,
    pub(crate) capacity: usize,
}

impl MemoryStore {
    /// Create an empty store with the given embedder and capacity.
    ///
    /// A zero capacity is clamped to 1 so eviction always has a record to
    /// drop.
    pub fn new(embedder: Box<dyn Embedder>, capacity: usize) -> Self {
        MemoryStore {
            records: Vec::new(),
            index: VectorIndex::new(),
            embedder,
            capacity: capacity.max(1),
        }
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum record count before FIFO eviction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> &[String] {
        &self.records
    }

    /// Add a text record, evicting the oldest record first when at capacity.
    ///
    /// Text is trimmed before storage; empty or whitespace-only text is a
    /// logged no-op. Eviction rebuilds the index from the surviving records
    /// through the embedder, because every position shifts down by one and
    /// the vector at position `i` must keep embedding `records[i]`.
    pub fn add(&mut self, text: &str) -> AddOutcome {
        let text = text.trim();
        if text.is_empty() {
            tracing::warn!("attempted to add empty or whitespace-only text, skipping");
            return AddOutcome::Skipped;
        }

        let mut evicted = false;
        if self.records.len() >= self.capacity {
            tracing::info!(
                capacity = self.capacity,
                "memory at capacity, evicting oldest record and rebuilding index"
            );
            self.records.remove(0);
            let vectors = self
                .records
                .iter()
                .map(|record| self.embed_normalized(record))
                .collect();
            self.index.rebuild(vectors);
            evicted = true;
        }

        let vector = self.embed_normalized(text);
        self.records.push(text.to_string());
        self.index.add(vector);

        debug_assert_eq!(self.records.len(), self.index.len());
        debug_assert!(self.records.len() <= self.capacity);

        tracing::debug!(size = self.records.len(), "record added to memory");
        AddOutcome::Added {
            position: self.records.len() - 1,
            evicted,
        }
    }

    /// Empty the record list and reset the index.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.reset();
        tracing::info!("memory cleared");
    }

    /// Embed text in the store's canonical form.
    ///
    /// Records and queries are both lower-cased before embedding, so a query
    /// equal to a stored record lands at distance zero regardless of case.
    pub(crate) fn embed_normalized(&self, text: &str) -> Vec<f32> {
        self.embedder.embed(&text.to_lowercase())
    }
}
