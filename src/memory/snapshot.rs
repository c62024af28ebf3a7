//! Snapshot persistence for the memory store.
//!
//! The snapshot is a versioned JSON file holding the record list and the
//! index contents. It is this crate's private state, not a wire format:
//! `load` never trusts the persisted vectors and always rebuilds the index
//! through the live embedder, so a snapshot written under one embedding
//! function stays usable under another.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::store::MemoryStore;
use crate::errors::Error;

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot layout.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    dims: usize,
    saved_at: String,
    records: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl MemoryStore {
    /// Persist the store to `path` as a snapshot file.
    ///
    /// Failure leaves the in-memory state untouched and is reported to the
    /// caller.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            dims: self.embedder.dims(),
            saved_at: Utc::now().to_rfc3339(),
            records: self.records.clone(),
            vectors: self.index.vectors().to_vec(),
        };

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &snapshot)?;
        // Flush here rather than in the implicit drop: BufWriter's drop
        // discards write errors, and a short snapshot may not leave the
        // buffer until flushed.
        writer.flush()?;

        tracing::info!(path = %path.display(), records = self.records.len(), "memory saved");
        Ok(())
    }

    /// Restore the store from a snapshot file.
    ///
    /// A missing file is a no-op. An unreadable or corrupt snapshot returns
    /// an error with the store left in its pre-call state, so a caller at
    /// startup can log it and continue with an empty store. On success the
    /// loaded records replace the current ones and the index is rebuilt by
    /// re-embedding every record; when the snapshot holds more records than
    /// this store's capacity, only the newest `capacity` records survive.
    pub fn load(&mut self, path: &Path) -> Result<(), Error> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no snapshot to load");
            return Ok(());
        }

        let file = File::open(path)?;
        let snapshot: Snapshot =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::Snapshot {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::Snapshot {
                path: path.to_path_buf(),
                reason: format!(
                    "unsupported snapshot version {} (expected {})",
                    snapshot.version, SNAPSHOT_VERSION
                ),
            });
        }
        if snapshot.vectors.len() != snapshot.records.len() {
            return Err(Error::Snapshot {
                path: path.to_path_buf(),
                reason: format!(
                    "{} vectors for {} records",
                    snapshot.vectors.len(),
                    snapshot.records.len()
                ),
            });
        }

        let mut records = snapshot.records;
        if records.len() > self.capacity {
            let excess = records.len() - self.capacity;
            tracing::info!(
                excess,
                capacity = self.capacity,
                "snapshot exceeds capacity, dropping oldest records"
            );
            records.drain(..excess);
        }

        let vectors = records
            .iter()
            .map(|record| self.embed_normalized(record))
            .collect();
        self.records = records;
        self.index.rebuild(vectors);

        debug_assert_eq!(self.records.len(), self.index.len());

        tracing::info!(
            path = %path.display(),
            records = self.records.len(),
            "memory rebuilt from snapshot"
        );
        Ok(())
    }
}
