//! Remote document store client.
//!
//! The remote side is a per-user document hierarchy with whole-document
//! read and overwrite operations. Transport, auth persistence, and
//! timeouts belong to the implementation behind [`RemoteDocs`]; the sync
//! engine only sees documents keyed by logical path.

mod http;
mod memory;
pub mod paths;

pub use http::HttpRemoteDocs;
pub use memory::MemoryRemoteDocs;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from the remote document client.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Permission denied: {0}")]
    Denied(String),

    #[error("Malformed remote payload: {0}")]
    Malformed(String),
}

/// Authenticated, per-user remote document store.
///
/// Writes are always whole-document overwrites, creating the document if
/// absent. Field-level patching does not exist at this layer.
#[async_trait]
pub trait RemoteDocs: Send + Sync {
    /// Overwrites (or creates) the document at `path`.
    async fn write_document(&self, path: &str, value: Value) -> Result<(), RemoteError>;

    /// Reads the document at `path`. Absence is `Ok(None)`, not an error.
    async fn read_document(&self, path: &str) -> Result<Option<Value>, RemoteError>;

    /// Reads every document under `prefix`, keyed by the path segment
    /// below the prefix. Used by date-keyed stores.
    async fn read_collection(&self, prefix: &str)
        -> Result<BTreeMap<String, Value>, RemoteError>;
}
