use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tracing::{debug, warn};

use super::CacheKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

type FetchResult<P> = Result<Arc<P>, CacheError>;
type PendingFetch<P> = Shared<BoxFuture<'static, FetchResult<P>>>;

#[derive(Debug)]
pub struct CacheEntry<P> {
    pub key: CacheKey,
    pub payload: Arc<P>,
    pub fetched_at: DateTime<Utc>,
}

impl<P> CacheEntry<P> {
    pub fn new(key: CacheKey, payload: Arc<P>) -> Self {
        Self {
            key,
            payload,
            fetched_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.fetched_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

struct State<P> {
    entries: HashMap<CacheKey, CacheEntry<P>>,
    in_flight: HashMap<CacheKey, (u64, PendingFetch<P>)>,
    /// Bumped by `invalidate_all`; fetches from an older generation never write.
    generation: u64,
}

impl<P> Default for State<P> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            generation: 0,
        }
    }
}

// The lock is never held across an await, so a poisoned state is still consistent.
fn lock<P>(state: &Mutex<State<P>>) -> MutexGuard<'_, State<P>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-lifetime cache of backend payloads.
///
/// Entries never expire on their own. A key is either absent or present; a
/// successful fetch populates it and [`invalidate_all`](Self::invalidate_all)
/// resets everything. Payloads are handed out as `Arc<P>`, so callers share
/// the cached value but cannot mutate it.
///
/// Cloning is cheap and every clone sees the same store.
pub struct DashboardDataCache<P> {
    state: Arc<Mutex<State<P>>>,
}

impl<P> Clone for DashboardDataCache<P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<P> Default for DashboardDataCache<P> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }
}

impl<P: Send + Sync + 'static> DashboardDataCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached payload for `key`, fetching it on a miss.
    ///
    /// `fetcher` is only called when the key is neither cached nor already
    /// being fetched. Concurrent callers for the same missing key share one
    /// fetch. Failures are returned to every waiting caller and leave the key
    /// absent, so the next call tries again.
    ///
    /// The fetch runs on a spawned task, so this must be called from within
    /// a tokio runtime.
    pub async fn get<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> FetchResult<P>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<P, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let pending = {
            let mut state = lock(&self.state);
            if let Some(entry) = state.entries.get(&key) {
                debug!(key = %key, "Cache hit");
                return Ok(Arc::clone(&entry.payload));
            }

            if let Some((_, pending)) = state.in_flight.get(&key) {
                debug!(key = %key, "Joining in-flight fetch");
                pending.clone()
            } else {
                debug!(key = %key, "Cache miss, fetching");
                let generation = state.generation;
                let pending = self.spawn_fetch(key.clone(), generation, fetcher());
                state
                    .in_flight
                    .insert(key, (generation, pending.clone()));
                pending
            }
        };

        pending.await
    }

    /// Run `fetch` to completion on its own task, independent of whoever is
    /// waiting for it, and record the outcome.
    fn spawn_fetch<Fut, E>(&self, key: CacheKey, generation: u64, fetch: Fut) -> PendingFetch<P>
    where
        Fut: Future<Output = Result<P, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let result = match fetch.await {
                Ok(payload) => Ok(Arc::new(payload)),
                Err(e) => Err(CacheError::FetchFailed(e.to_string())),
            };

            let mut state = lock(&state);
            if state.generation != generation {
                debug!(key = %task_key, "Discarding fetch that started before invalidation");
                return result;
            }
            state.in_flight.remove(&task_key);
            match &result {
                Ok(payload) => {
                    debug!(key = %task_key, "Cached fetched payload");
                    let entry = CacheEntry::new(task_key.clone(), Arc::clone(payload));
                    state.entries.insert(task_key, entry);
                }
                Err(e) => warn!(key = %task_key, error = %e, "Fetch failed, not caching"),
            }
            result
        });

        let state = Arc::clone(&self.state);
        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    let mut state = lock(&state);
                    if state.generation == generation {
                        state.in_flight.remove(&key);
                    }
                    Err(CacheError::FetchFailed(format!("fetch task failed: {}", e)))
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Cached payload for `key`, without fetching.
    pub fn peek(&self, key: &CacheKey) -> Option<Arc<P>> {
        lock(&self.state)
            .entries
            .get(key)
            .map(|entry| Arc::clone(&entry.payload))
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        lock(&self.state).entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How long ago `key` was fetched, for display.
    pub fn entry_age(&self, key: &CacheKey) -> Option<String> {
        lock(&self.state).entries.get(key).map(|e| e.age_display())
    }

    /// Drop the cached entry for one key.
    ///
    /// A fetch already in flight for the key is left alone and will still
    /// populate it. Returns whether an entry was removed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let removed = lock(&self.state).entries.remove(key).is_some();
        if removed {
            debug!(key = %key, "Invalidated cache entry");
        }
        removed
    }

    /// Empty the whole store.
    ///
    /// Callers are expected to re-issue whatever `get`s their current view
    /// needs. Fetches still running will answer their waiters but no longer
    /// write into the store.
    pub fn invalidate_all(&self) {
        let mut state = lock(&self.state);
        let dropped = state.entries.len();
        state.entries.clear();
        state.in_flight.clear();
        state.generation += 1;
        debug!(dropped, generation = state.generation, "Invalidated all cache entries");
    }
}

// ============================================================================
// Tests
// ============================================================================
