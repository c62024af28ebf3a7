//! Bounded-capacity memory store orchestrating embedding, indexing, and
//! snapshot persistence.
//!
//! Provides a high-level API for retaining text records, searching them with
//! semantic + keyword hybrid retrieval, and round-tripping the store through
//! an opaque snapshot file.

mod search;
mod snapshot;

// pub(crate): module internals hidden; public items re-exported explicitly via lib.rs
pub(crate) mod store;

pub use search::DEFAULT_SEARCH_K;
pub use store::{AddOutcome, MemoryStore};
