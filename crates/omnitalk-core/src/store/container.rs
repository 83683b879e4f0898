//! Generic persisted state container.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use tracing::{debug, warn};

use super::storage::{KeyValueStorage, StateCodec};
use crate::error::Result;

/// Callback invoked with the new state after every change.
pub type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct ListenerRegistry<S> {
    next_id: u64,
    entries: Vec<(u64, Listener<S>)>,
}

impl<S> ListenerRegistry<S> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

fn lock_registry<S>(registry: &Mutex<ListenerRegistry<S>>) -> MutexGuard<'_, ListenerRegistry<S>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by [`Store::subscribe`].
///
/// The listener stays registered for as long as the handle lives. Dropping it,
/// or calling [`Subscription::unsubscribe`], removes the listener.
#[must_use = "dropping a Subscription unregisters its listener immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Removes the listener from its store.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// An in-memory state value mirrored to durable storage under a fixed name.
///
/// Every mutation goes through [`Store::update`], which
///
/// 1. applies the change under the write lock,
/// 2. notifies subscribers with the new state (outside the state lock),
/// 3. writes the full serialized state back under the store name.
///
/// The three steps of one mutation run before any other mutation, load or
/// save of the same store starts, so storage and subscribers observe changes in
/// the order they were applied. Listeners may read the store but must not
/// mutate it.
///
/// The in-memory change is kept even when the write fails; the write error is
/// returned to the caller.
pub struct Store<S> {
    name: String,
    state: RwLock<S>,
    commit: Mutex<()>,
    storage: Arc<dyn KeyValueStorage>,
    codec: Arc<dyn StateCodec<S>>,
    listeners: Arc<Mutex<ListenerRegistry<S>>>,
}

impl<S> Store<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Opens the store named `name`.
    ///
    /// If `storage` holds a blob under that name it becomes the initial state.
    /// A blob that fails to decode is logged and replaced by `default` in memory;
    /// nothing is written until the first mutation. Storage read errors are
    /// returned as-is.
    pub fn open(
        name: impl Into<String>,
        storage: Arc<dyn KeyValueStorage>,
        codec: Arc<dyn StateCodec<S>>,
        default: S,
    ) -> Result<Self> {
        let name = name.into();

        let initial = match storage.get(&name)? {
            Some(blob) => match codec.decode(&blob) {
                Ok(state) => {
                    debug!(store = %name, "Restored persisted state");
                    state
                }
                Err(e) => {
                    warn!(store = %name, error = %e, "Discarding unreadable persisted state");
                    default
                }
            },
            None => {
                debug!(store = %name, "No persisted state, starting from defaults");
                default
            }
        };

        Ok(Self {
            name,
            state: RwLock::new(initial),
            commit: Mutex::new(()),
            storage,
            codec,
            listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
        })
    }

    /// Storage key of this store.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> S {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Mutates the state, notifies subscribers and persists the result.
    ///
    /// Returns whatever `f` returns, or the persistence error.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R> {
        let _commit = self.lock_commit();
        let (output, snapshot) = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let output = f(&mut state);
            (output, state.clone())
        };

        self.notify(&snapshot);
        self.persist(&snapshot)?;
        Ok(output)
    }

    /// Like [`Store::update`], but `f` may reject the change.
    ///
    /// `f` works on a copy of the state. On `Err` the copy is discarded and
    /// nothing is notified or written.
    pub fn try_update<R>(&self, f: impl FnOnce(&mut S) -> Result<R>) -> Result<R> {
        let _commit = self.lock_commit();
        let (output, snapshot) = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let mut draft = state.clone();
            let output = f(&mut draft)?;
            *state = draft.clone();
            (output, draft)
        };

        self.notify(&snapshot);
        self.persist(&snapshot)?;
        Ok(output)
    }

    /// Replaces the in-memory state with the persisted blob, if there is one.
    ///
    /// Returns `true` when a blob was found and loaded. Subscribers are notified
    /// after a successful load. Unlike [`Store::open`], a blob that fails to
    /// decode is reported as an error here.
    pub fn load(&self) -> Result<bool> {
        let _commit = self.lock_commit();
        let Some(blob) = self.storage.get(&self.name)? else {
            return Ok(false);
        };
        let loaded = self.codec.decode(&blob)?;

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = loaded.clone();
        }
        self.notify(&loaded);
        Ok(true)
    }

    /// Writes the current state to storage.
    pub fn save(&self) -> Result<()> {
        let _commit = self.lock_commit();
        let snapshot = self.snapshot();
        self.persist(&snapshot)
    }

    /// Registers `listener` to be called with the new state after every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = {
            let mut registry = lock_registry(&self.listeners);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<Mutex<ListenerRegistry<S>>> = Arc::downgrade(&self.listeners);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    lock_registry(&registry)
                        .entries
                        .retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Number of currently registered listeners.
    pub fn subscriber_count(&self) -> usize {
        lock_registry(&self.listeners).entries.len()
    }

    fn lock_commit(&self) -> MutexGuard<'_, ()> {
        self.commit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, state: &S) {
        // Listeners may subscribe, unsubscribe or read the store themselves.
        let listeners: Vec<Listener<S>> = lock_registry(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(state);
        }
    }

    fn persist(&self, state: &S) -> Result<()> {
        let blob = self.codec.encode(state)?;
        self.storage.set(&self.name, &blob)?;
        debug!(store = %self.name, bytes = blob.len(), "Persisted state");
        Ok(())
    }
}
