//! Debounce timers keyed by store.
//!
//! At most one pending timer exists per store: arming a key that already
//! has a timer cancels the old one and starts over with the new delay, so
//! a burst of mutations collapses into a single write. Distinct stores
//! debounce independently. `cancel_all` aborts without flushing.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::store::StoreId;

pub struct DebounceScheduler {
    runtime: Handle,
    timers: Arc<Mutex<HashMap<StoreId, JoinHandle<()>>>>,
}

impl DebounceScheduler {
    /// Creates a scheduler that spawns its timers onto `runtime`. Store
    /// mutations may arrive from threads outside the runtime, so the
    /// handle is captured once rather than resolved per arm.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arms (or re-arms) the timer for `key`. Any pending timer for the
    /// same key is aborted first; its task never runs.
    pub fn arm<F>(&self, key: StoreId, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // The deadline is fixed here, at arm time; creating the sleep
        // inside the task would measure the window from the task's first
        // poll instead of from the mutation.
        let sleep = tokio::time::sleep(delay);
        let timer = self.runtime.spawn(async move {
            sleep.await;
            task.await;
        });

        let mut timers = self.timers.lock().expect("timer lock poisoned");
        if let Some(previous) = timers.insert(key, timer) {
            previous.abort();
        }
    }

    /// Aborts every pending timer without running its task.
    pub fn cancel_all(&self) {
        let mut timers = self.timers.lock().expect("timer lock poisoned");
        for (_, timer) in timers.drain() {
            timer.abort();
        }
    }

    /// Number of timers that have neither fired nor been canceled.
    pub fn pending(&self) -> usize {
        let timers = self.timers.lock().expect("timer lock poisoned");
        timers.values().filter(|t| !t.is_finished()).count()
    }
}
