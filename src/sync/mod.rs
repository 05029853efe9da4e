//! The local/remote synchronization engine.
//!
//! One session per authenticated user: a bootstrap merge pulls remote
//! state into empty local stores, then per-store observers mirror local
//! mutations to the remote document store under a debounced write policy.
//! Sync is best-effort; no error from this module reaches the UI.

mod bootstrap;
mod change;
mod debounce;
mod session;

pub use bootstrap::merge_remote_into_local_if_empty;
pub use change::ChangeDetector;
pub use debounce::DebounceScheduler;
pub use session::{SessionState, SyncSession};

use std::sync::Arc;

use crate::store::StoreId;

/// Outcome of one remote write attempt.
///
/// Consumed only by the observability hook; the engine never branches on
/// it. Dropping failed writes is the intended availability-over-
/// consistency trade-off: the next local mutation re-arms the debounce
/// and tries again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Ok,
    NetworkError(String),
    ValidationError(String),
}

/// Hook invoked after every write attempt.
pub type SyncObserver = Arc<dyn Fn(StoreId, &SyncOutcome) + Send + Sync>;

/// The default observer: logs and nothing else.
pub fn logging_observer() -> SyncObserver {
    Arc::new(|store, outcome| match outcome {
        SyncOutcome::Ok => tracing::debug!("Synced {} store", store),
        SyncOutcome::NetworkError(e) => {
            tracing::warn!("Dropped write for {} store: {}", store, e)
        }
        SyncOutcome::ValidationError(e) => {
            tracing::warn!("Rejected write for {} store: {}", store, e)
        }
    })
}
