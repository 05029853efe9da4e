//! In-memory remote document store.
//!
//! Backs tests and offline runs. Documents live in a flat map keyed by
//! full path; collection reads gather every direct child of a prefix.
//! Write counts are recorded per path so tests can assert on debounce
//! coalescing, and failure injection covers the fetch/write error paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{RemoteDocs, RemoteError};

/// Remote document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryRemoteDocs {
    docs: Mutex<BTreeMap<String, Value>>,
    write_counts: Mutex<BTreeMap<String, usize>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryRemoteDocs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a document, without counting as a write.
    pub fn seed(&self, path: impl Into<String>, value: Value) {
        self.docs.lock().unwrap().insert(path.into(), value);
    }

    /// Returns the current document at `path`, if any.
    pub fn document(&self, path: &str) -> Option<Value> {
        self.docs.lock().unwrap().get(path).cloned()
    }

    /// Number of writes that have landed on `path`.
    pub fn writes_to(&self, path: &str) -> usize {
        self.write_counts
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Total writes across all paths.
    pub fn total_writes(&self) -> usize {
        self.write_counts.lock().unwrap().values().sum()
    }

    /// Number of writes to paths under `prefix` (exclusive of the prefix
    /// itself).
    pub fn writes_under(&self, prefix: &str) -> usize {
        let wanted = format!("{prefix}/");
        self.write_counts
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.starts_with(&wanted))
            .map(|(_, count)| count)
            .sum()
    }

    /// When set, every write fails with a network error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// When set, every read fails with a network error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteDocs for MemoryRemoteDocs {
    async fn write_document(&self, path: &str, value: Value) -> Result<(), RemoteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("injected write failure".to_string()));
        }

        self.docs.lock().unwrap().insert(path.to_string(), value);
        *self
            .write_counts
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn read_document(&self, path: &str) -> Result<Option<Value>, RemoteError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("injected read failure".to_string()));
        }

        Ok(self.docs.lock().unwrap().get(path).cloned())
    }

    async fn read_collection(
        &self,
        prefix: &str,
    ) -> Result<BTreeMap<String, Value>, RemoteError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("injected read failure".to_string()));
        }

        let wanted = format!("{prefix}/");
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .iter()
            .filter_map(|(path, value)| {
                let key = path.strip_prefix(&wanted)?;
                // Only direct children; nested paths belong to other stores.
                if key.contains('/') {
                    return None;
                }
                Some((key.to_string(), value.clone()))
            })
            .collect())
    }
}
