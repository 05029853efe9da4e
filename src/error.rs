//! Library error types.

use thiserror::Error;

use crate::remote::RemoteError;

/// Errors surfaced by the sync engine's own operations.
///
/// Note that the background sync paths (bootstrap fetch, debounced write)
/// deliberately never return these to the caller; they log and continue.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote document error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
