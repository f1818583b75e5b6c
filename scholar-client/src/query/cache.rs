//! Shared query cache.

use super::{QueryKey, QueryState, QueryStatus};
use crate::error::{ApiClientError, ErrorKind, QueryError};
use chrono::Utc;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use scholar_core::Timestamp;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

type Payload = Arc<dyn Any + Send + Sync>;
type Inflight = Shared<BoxFuture<'static, ()>>;

#[derive(Default)]
struct Entry {
    status: QueryStatus,
    data: Option<Payload>,
    error: Option<QueryError>,
    fetched_at: Option<Timestamp>,
    stale: bool,
    /// Generation of the fetch whose result this entry will accept.
    generation: u64,
    inflight: Option<Inflight>,
}

impl Entry {
    fn needs_fetch(&self) -> bool {
        self.status == QueryStatus::Idle || self.stale
    }

    fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        let data = self
            .data
            .clone()
            .and_then(|payload| match payload.downcast::<T>() {
                Ok(data) => Some(data),
                Err(_) => {
                    tracing::warn!(%key, "cached payload read with a different type");
                    None
                }
            });
        QueryState {
            status: self.status,
            data,
            error: self.error.clone(),
            fetched_at: self.fetched_at,
            stale: self.stale,
        }
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    /// Cache-wide so results issued before a `clear()` can never match a
    /// recreated entry.
    generation: AtomicU64,
    version: watch::Sender<u64>,
}

/// Keyed cache of async results, shared by every page.
///
/// Cheap to clone; clones share state. No TTL: entries refetch only after
/// an explicit invalidation or refetch.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let (version, _rx) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
                version,
            }),
        }
    }

    /// Current state for `key`, starting a background fetch when the entry
    /// is missing or stale. Concurrent reads of a key that is already
    /// loading share that fetch; `fetch` is not called for them.
    pub fn read<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiClientError>> + Send + 'static,
    {
        let mut entries = self.lock();
        let entry = entries.entry(key.clone()).or_default();
        if entry.needs_fetch() {
            self.start_fetch(entry, key, fetch());
        }
        entry.snapshot(key)
    }

    /// Like [`read`](Self::read) but waits until the key settles.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiClientError>> + Send + 'static,
    {
        let _ = self.read::<T, F, Fut>(key, fetch);
        self.settled(key).await
    }

    /// Wait for any in-flight fetch of `key`, following supersessions.
    pub async fn settled<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        loop {
            let inflight = {
                let entries = self.lock();
                entries.get(key).and_then(|entry| entry.inflight.clone())
            };
            match inflight {
                Some(task) => task.await,
                None => return self.peek(key),
            }
        }
    }

    /// Force a new fetch even if the entry is fresh. Retry affordance.
    pub fn refetch<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiClientError>> + Send + 'static,
    {
        let mut entries = self.lock();
        let entry = entries.entry(key.clone()).or_default();
        self.start_fetch(entry, key, fetch());
        entry.snapshot(key)
    }

    /// Snapshot without side effects.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        let entries = self.lock();
        entries
            .get(key)
            .map(|entry| entry.snapshot(key))
            .unwrap_or_default()
    }

    /// Mark every entry under `prefix` stale. Data is kept; nothing is
    /// fetched until the next read. Returns how many entries became stale.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let count = self.invalidate_where(|key| key.starts_with(prefix));
        tracing::debug!(prefix = %prefix, invalidated = count, "cache prefix invalidated");
        count
    }

    pub fn invalidate_where(&self, predicate: impl Fn(&QueryKey) -> bool) -> usize {
        let count = {
            let mut entries = self.lock();
            entries
                .iter_mut()
                .filter(|(key, entry)| !entry.stale && predicate(key))
                .map(|(_, entry)| entry.stale = true)
                .count()
        };
        if count > 0 {
            self.notify();
        }
        count
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.lock().get(key).is_some_and(|entry| entry.stale)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. In-flight results are discarded when they land.
    pub fn clear(&self) {
        let dropped = {
            let mut entries = self.lock();
            let dropped = entries.len();
            entries.clear();
            dropped
        };
        tracing::debug!(dropped, "query cache cleared");
        self.notify();
    }

    /// Receiver bumped whenever an entry settles, is invalidated or the
    /// cache is cleared.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    fn start_fetch<T, Fut>(&self, entry: &mut Entry, key: &QueryKey, fut: Fut)
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiClientError>> + Send + 'static,
    {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        entry.status = QueryStatus::Loading;
        entry.error = None;
        entry.stale = false;
        entry.generation = generation;

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::error!(%key, "query read outside of a tokio runtime");
                entry.status = QueryStatus::Error;
                entry.error = Some(QueryError::new(
                    ErrorKind::Client,
                    "No async runtime available",
                ));
                entry.inflight = None;
                return;
            }
        };

        let cache = self.clone();
        let owned_key = key.clone();
        let task: Inflight = async move {
            let result = fut.await;
            cache.complete(&owned_key, generation, result);
        }
        .boxed()
        .shared();
        entry.inflight = Some(task.clone());
        handle.spawn(task);
        tracing::debug!(%key, generation, "query fetch started");
    }

    fn complete<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        generation: u64,
        result: Result<T, ApiClientError>,
    ) {
        {
            let mut entries = self.lock();
            let Some(entry) = entries.get_mut(key) else {
                tracing::debug!(%key, "query result dropped, entry was cleared");
                return;
            };
            if entry.generation != generation {
                tracing::debug!(
                    %key,
                    generation,
                    current = entry.generation,
                    "discarding superseded query result"
                );
                return;
            }
            entry.inflight = None;
            match result {
                Ok(value) => {
                    entry.status = QueryStatus::Success;
                    entry.data = Some(Arc::new(value));
                    entry.error = None;
                    entry.fetched_at = Some(Utc::now());
                }
                Err(err) => {
                    tracing::debug!(%key, error = %err, "query failed");
                    entry.status = QueryStatus::Error;
                    entry.error = Some(QueryError::from(&err));
                }
            }
        }
        self.notify();
    }

    fn notify(&self) {
        self.inner.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
