//! Session controller: lifecycle of one authenticated sync session.
//!
//! `start` runs the bootstrap merge to completion, then installs one
//! mutation observer per store. Each observer runs the change detector
//! and, on a real change, arms that store's debounce timer; the timer
//! reads the snapshot at fire time and performs the remote write.
//! `teardown` removes every observer and aborts every pending timer
//! without flushing, and is safe to call any number of times.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::runtime::Handle;

use super::change::ChangeDetector;
use super::debounce::DebounceScheduler;
use super::{logging_observer, merge_remote_into_local_if_empty, SyncObserver, SyncOutcome};
use crate::config::SyncConfig;
use crate::remote::paths::{self, DocTarget};
use crate::remote::{RemoteDocs, RemoteError};
use crate::store::{StoreHandle, StoreRegistry, SubscriptionId};

/// Lifecycle of a session instance.
///
/// `Idle` describes the app before any session exists (no authenticated
/// user with hydrated local state); a constructed session starts in
/// `Merging`. `TornDown` is terminal: re-authentication builds a fresh
/// session rather than reviving this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Merging,
    Listening,
    TornDown,
}

/// One authenticated user's sync session.
///
/// Dropping the session tears it down.
pub struct SyncSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    user_id: String,
    remote: Arc<dyn RemoteDocs>,
    config: SyncConfig,
    detector: ChangeDetector,
    scheduler: DebounceScheduler,
    observer: SyncObserver,
    state: Mutex<SessionState>,
    subscriptions: Mutex<Vec<(Arc<dyn StoreHandle>, SubscriptionId)>>,
    torn_down: AtomicBool,
}

impl SyncSession {
    /// Merges remote state into empty local stores, then starts listening
    /// for local mutations. Resolves even under total remote failure; the
    /// affected stores simply stay local-only.
    pub async fn start(
        registry: &StoreRegistry,
        remote: Arc<dyn RemoteDocs>,
        config: SyncConfig,
        user_id: impl Into<String>,
    ) -> Self {
        Self::start_with_observer(registry, remote, config, user_id, logging_observer()).await
    }

    /// Like [`SyncSession::start`], with a custom write-outcome hook.
    pub async fn start_with_observer(
        registry: &StoreRegistry,
        remote: Arc<dyn RemoteDocs>,
        config: SyncConfig,
        user_id: impl Into<String>,
        observer: SyncObserver,
    ) -> Self {
        let inner = Arc::new(SessionInner {
            user_id: user_id.into(),
            remote,
            config,
            detector: ChangeDetector::new(),
            scheduler: DebounceScheduler::new(Handle::current()),
            observer,
            state: Mutex::new(SessionState::Merging),
            subscriptions: Mutex::new(Vec::new()),
            torn_down: AtomicBool::new(false),
        });

        tracing::info!("Starting sync session for {}", inner.user_id);
        let handles = registry.handles();
        merge_remote_into_local_if_empty(&handles, inner.remote.as_ref(), &inner.user_id).await;

        // Listeners attach only after the merge resolves, with the merged
        // state as the change baseline.
        let mut subscriptions = Vec::with_capacity(handles.len());
        for handle in handles {
            inner.detector.prime(handle.as_ref());

            let observer_inner = inner.clone();
            let observer_handle = handle.clone();
            let sub = handle.subscribe(Box::new(move || {
                observer_inner
                    .clone()
                    .on_store_changed(observer_handle.clone());
            }));
            subscriptions.push((handle, sub));
        }
        *inner.subscriptions.lock().expect("session lock poisoned") = subscriptions;
        *inner.state.lock().expect("session lock poisoned") = SessionState::Listening;

        Self { inner }
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.lock().expect("session lock poisoned")
    }

    /// Ends the session: unsubscribes every store observer and cancels
    /// every pending debounced write without flushing it. Unsynced edits
    /// inside the window stay local and are not written. Idempotent.
    pub fn teardown(&self) {
        self.inner.teardown();
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl SessionInner {
    fn on_store_changed(self: Arc<Self>, handle: Arc<dyn StoreHandle>) {
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }
        if !self.detector.observe(handle.as_ref()) {
            return;
        }

        let store = handle.id();
        let window = self.config.window_for(store);
        let task_inner = self.clone();
        let task_handle = handle;

        self.scheduler.arm(store, window, async move {
            // A teardown racing ahead of the abort must still win.
            if task_inner.torn_down.load(Ordering::SeqCst) {
                return;
            }
            let outcome = task_inner.push_store(task_handle.as_ref()).await;
            (task_inner.observer.as_ref())(store, &outcome);
        });
    }

    /// Writes the store's current snapshot remotely: the state at fire
    /// time, not at arm time, so mutations landing between the two are
    /// not dropped.
    async fn push_store(&self, handle: &dyn StoreHandle) -> SyncOutcome {
        let snapshot = handle.snapshot_value();

        match paths::target(handle.id(), &self.user_id) {
            DocTarget::Doc(path) => match self.remote.write_document(&path, snapshot).await {
                Ok(()) => SyncOutcome::Ok,
                Err(e) => outcome_of(e),
            },
            DocTarget::Collection(prefix) => {
                let Value::Object(days) = snapshot else {
                    return SyncOutcome::ValidationError(format!(
                        "{} snapshot is not a keyed map",
                        handle.id()
                    ));
                };
                for (key, doc) in days {
                    let path = paths::keyed(&prefix, &key);
                    if let Err(e) = self.remote.write_document(&path, doc).await {
                        return outcome_of(e);
                    }
                }
                SyncOutcome::Ok
            }
        }
    }

    fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut subscriptions = self.subscriptions.lock().expect("session lock poisoned");
        for (handle, sub) in subscriptions.drain(..) {
            handle.unsubscribe(sub);
        }
        self.scheduler.cancel_all();
        *self.state.lock().expect("session lock poisoned") = SessionState::TornDown;
        tracing::info!("Sync session for {} torn down", self.user_id);
    }
}

fn outcome_of(error: RemoteError) -> SyncOutcome {
    match error {
        RemoteError::Network(e) => SyncOutcome::NetworkError(e),
        RemoteError::Denied(e) | RemoteError::Malformed(e) => SyncOutcome::ValidationError(e),
    }
}
