//! The writer-adapter contract and a default in-memory implementation.

use crate::records::DecodedRecord;
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

/// Storage key of a staged or committed record: `(collection, id)`.
pub type RecordKey = (&'static str, String);

/// Buffers and commits decoded records towards a backing store.
///
/// The pipeline stages records with `persist` from several workers at once and
/// commits them with `flush` at its checkpoints; `flush` calls are serialized
/// by the checkpoint protocol, `persist` calls are not.
#[async_trait]
pub trait WriterAdapter: Send + Sync {
    /// Stages one record. Idempotent upsert: the last value staged for a key
    /// wins at commit time. Must be safe to call concurrently.
    async fn persist(&self, record: DecodedRecord) -> Result<()>;

    /// Commits all staged records. Safe to call repeatedly, including with
    /// nothing staged.
    async fn flush(&self) -> Result<()>;
}

/// A [`WriterAdapter`] keeping its records in process memory.
///
/// Staged writes live in one `DashMap` and move to the committed map on
/// `flush`. Serving layers and tests read committed records through the
/// accessors.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    staged: DashMap<RecordKey, DecodedRecord>,
    committed: DashMap<RecordKey, DecodedRecord>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed record stored under `(collection, id)`, if any.
    pub fn get(&self, collection: &'static str, id: &str) -> Option<DecodedRecord> {
        self.committed
            .get(&(collection, id.to_string()))
            .map(|entry| entry.value().clone())
    }

    /// Number of committed records in `collection`.
    pub fn collection_len(&self, collection: &'static str) -> usize {
        self.committed
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .count()
    }

    /// Number of records staged but not yet flushed.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

#[async_trait]
impl WriterAdapter for MemoryWriter {
    async fn persist(&self, record: DecodedRecord) -> Result<()> {
        let key = (record.collection(), record.key().to_string());
        self.staged.insert(key, record);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let keys: Vec<RecordKey> = self.staged.iter().map(|entry| entry.key().clone()).collect();
        for key in keys {
            if let Some((key, record)) = self.staged.remove(&key) {
                self.committed.insert(key, record);
            }
        }
        Ok(())
    }
}
