//! recall - A bounded semantic memory store.
//!
//! This crate retains a growing corpus of text records under a fixed
//! capacity, embeds each into a fixed-dimension vector, and answers
//! similarity queries augmented with keyword filtering. It backs a
//! retrieval-augmented workflow where prior question/answer text is recalled
//! to enrich a downstream generation step. All operations are synchronous
//! (no async/await required).
//!
//! # Example
//!
//! ```
//! use recall::MemoryStore;
//! use recall::embedding::byte::ByteEmbedder;
//!
//! let mut store = MemoryStore::new(Box::new(ByteEmbedder::new(384)), 200);
//!
//! store.add("deploy the app with three replicas");
//! store.add("roll back the gateway release");
//!
//! let results = store.search("how do I deploy", 3);
//! for result in results {
//!     println!("{result}");
//! }
//! ```
//!
//! # Capacity and eviction
//!
//! When an `add` would exceed capacity the oldest record is dropped first
//! (strict FIFO) and the vector index is rebuilt from the survivors, so
//! index positions always correspond to record positions exactly.

pub mod commands;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod index;
pub mod memory;
pub mod output;

// Re-export public API
pub use config::Config;
pub use embedding::{EMBEDDING_DIMS, Embedder, create_embedder};
pub use errors::Error;
pub use index::VectorIndex;
pub use memory::store::DEFAULT_CAPACITY;
pub use memory::{AddOutcome, DEFAULT_SEARCH_K, MemoryStore};
