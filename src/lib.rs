//! VitaTrack Sync
//!
//! Local/remote synchronization engine for the VitaTrack health tracker.
//! Application data lives on-device in independent stores and is mirrored
//! best-effort to a per-user remote document hierarchy: a bootstrap merge
//! recovers remote state into empty local stores at session start, then
//! debounced per-store writes propagate local mutations outward until the
//! session is torn down.

pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod store;
pub mod sync;

pub use config::{ConfigError, SyncConfig};
pub use error::SyncError;
pub use remote::{HttpRemoteDocs, MemoryRemoteDocs, RemoteDocs, RemoteError};
pub use store::{ChangeStrategy, Store, StoreHandle, StoreId, StoreRegistry, SubscriptionId};
pub use sync::{
    logging_observer, merge_remote_into_local_if_empty, ChangeDetector, DebounceScheduler,
    SessionState, SyncObserver, SyncOutcome, SyncSession,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
