//! Typed stores and the registry handed to the sync session.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{ChangeStrategy, StoreHandle, StoreId};
use crate::error::SyncError;
use crate::models::{
    ChatMessage, DiaryDay, ExercisePrefs, FoodItem, Profile, Program, ScheduleEntry,
    WorkoutSession,
};

/// Identifies one subscription on one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn() + Send + Sync>;

/// One local collection with synchronous change notification.
///
/// State is cloned out on read; mutation happens inside [`Store::update`]
/// under a write lock, after which observers run outside the lock. The
/// version counter increments on every committed mutation, which is the
/// contract the sync engine's change detector depends on.
pub struct Store<T> {
    id: StoreId,
    strategy: ChangeStrategy,
    state: RwLock<T>,
    version: AtomicU64,
    observers: Mutex<HashMap<u64, Observer>>,
    next_observer: AtomicU64,
    empty_when: fn(&T) -> bool,
    accept_remote: fn(&T) -> bool,
}

impl<T> Store<T>
where
    T: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        id: StoreId,
        strategy: ChangeStrategy,
        empty_when: fn(&T) -> bool,
        accept_remote: fn(&T) -> bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            strategy,
            state: RwLock::new(T::default()),
            version: AtomicU64::new(0),
            observers: Mutex::new(HashMap::new()),
            next_observer: AtomicU64::new(1),
            empty_when,
            accept_remote,
        })
    }

    /// Returns a clone of the current state.
    pub fn snapshot(&self) -> T {
        self.state.read().expect("store lock poisoned").clone()
    }

    /// Applies a mutation, bumps the version, and notifies observers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut state = self.state.write().expect("store lock poisoned");
            f(&mut state);
        }
        self.version.fetch_add(1, Ordering::SeqCst);
        self.notify();
    }

    /// Replaces the state wholesale. Used by the bootstrap merge.
    pub fn replace(&self, value: T) {
        {
            let mut state = self.state.write().expect("store lock poisoned");
            *state = value;
        }
        self.version.fetch_add(1, Ordering::SeqCst);
        self.notify();
    }

    fn notify(&self) {
        let observers = self.observers.lock().expect("observer lock poisoned");
        for observer in observers.values() {
            observer();
        }
    }
}

impl<T> StoreHandle for Store<T>
where
    T: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn id(&self) -> StoreId {
        self.id
    }

    fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    fn snapshot_value(&self) -> Value {
        let state = self.state.read().expect("store lock poisoned");
        // Domain models serialize infallibly; a failure here is a bug.
        serde_json::to_value(&*state).unwrap_or(Value::Null)
    }

    fn replace_value(&self, value: Value) -> Result<(), SyncError> {
        let typed: T = serde_json::from_value(value)?;
        self.replace(typed);
        Ok(())
    }

    fn is_empty(&self) -> bool {
        let state = self.state.read().expect("store lock poisoned");
        (self.empty_when)(&state)
    }

    fn accepts_remote(&self, value: &Value) -> bool {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(typed) => (self.accept_remote)(&typed),
            Err(e) => {
                tracing::warn!("Malformed remote data for {} store: {}", self.id, e);
                false
            }
        }
    }

    fn change_strategy(&self) -> ChangeStrategy {
        self.strategy
    }

    fn subscribe(&self, observer: Observer) -> SubscriptionId {
        let id = self.next_observer.fetch_add(1, Ordering::SeqCst);
        self.observers
            .lock()
            .expect("observer lock poisoned")
            .insert(id, observer);
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.observers
            .lock()
            .expect("observer lock poisoned")
            .remove(&id.0);
    }
}

/// The eight standard stores, built together and passed explicitly into
/// the sync session. Tests can construct registries and sessions freely;
/// nothing here is global.
pub struct StoreRegistry {
    pub profile: Arc<Store<Profile>>,
    pub diary: Arc<Store<BTreeMap<NaiveDate, DiaryDay>>>,
    pub workouts: Arc<Store<BTreeMap<NaiveDate, Vec<WorkoutSession>>>>,
    pub programs: Arc<Store<Vec<Program>>>,
    pub schedule: Arc<Store<Vec<ScheduleEntry>>>,
    pub chat: Arc<Store<Vec<ChatMessage>>>,
    pub food_library: Arc<Store<Vec<FoodItem>>>,
    pub exercise_prefs: Arc<Store<ExercisePrefs>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self {
            profile: Store::new(
                StoreId::Profile,
                ChangeStrategy::Versioned,
                |p: &Profile| !p.onboarded,
                // A half-finished remote profile must not be imported over
                // a user who is about to onboard locally.
                |p: &Profile| p.onboarded,
            ),
            diary: Store::new(
                StoreId::Diary,
                ChangeStrategy::KeySet,
                |d| d.is_empty(),
                |_| true,
            ),
            workouts: Store::new(
                StoreId::Workouts,
                ChangeStrategy::KeySet,
                |w| w.is_empty(),
                |_| true,
            ),
            programs: Store::new(
                StoreId::Programs,
                ChangeStrategy::Versioned,
                |p: &Vec<Program>| p.is_empty(),
                |_| true,
            ),
            schedule: Store::new(
                StoreId::Schedule,
                ChangeStrategy::Versioned,
                |s: &Vec<ScheduleEntry>| s.is_empty(),
                |_| true,
            ),
            chat: Store::new(
                StoreId::Chat,
                ChangeStrategy::Versioned,
                |c: &Vec<ChatMessage>| c.is_empty(),
                |_| true,
            ),
            food_library: Store::new(
                StoreId::FoodLibrary,
                ChangeStrategy::DeepEqual,
                |f: &Vec<FoodItem>| f.is_empty(),
                |_| true,
            ),
            exercise_prefs: Store::new(
                StoreId::ExercisePrefs,
                ChangeStrategy::DeepEqual,
                |p: &ExercisePrefs| p.is_default(),
                |_| true,
            ),
        }
    }

    /// Type-erased handles for every store, in registration order.
    pub fn handles(&self) -> Vec<Arc<dyn StoreHandle>> {
        vec![
            self.profile.clone(),
            self.diary.clone(),
            self.workouts.clone(),
            self.programs.clone(),
            self.schedule.clone(),
            self.chat.clone(),
            self.food_library.clone(),
            self.exercise_prefs.clone(),
        ]
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}
