//! Query client that orchestrates caching with network fetching.

use chrono::{Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::storage::{CacheStorage, MemoryStorage};
use super::traits::{CacheKey, CacheResult, QueryKey};
use crate::error::{ApiError, Result};

type SharedFetch = Shared<BoxFuture<'static, Result<Value>>>;

struct InFlight {
  id: u64,
  fetch: SharedFetch,
}

type InFlightMap = HashMap<CacheKey, InFlight>;

/// Invalidated prefix to the generation it was last invalidated at
type EpochMap = HashMap<CacheKey, u64>;

/// Explicit, injectable query cache.
///
/// - Reads are served from a fresh cache entry when there is one.
/// - Concurrent reads of the same key share a single in-flight fetch.
/// - Invalidation marks entries stale and forgets their in-flight fetches,
///   so the next read refetches.
/// - Every invalidation also advances an epoch kept here rather than in
///   storage, so observers notice it even when nothing was cached.
///
/// Cloning is cheap; clones share storage and in-flight state.
#[derive(Clone)]
pub struct QueryClient {
  storage: Arc<dyn CacheStorage>,
  in_flight: Arc<Mutex<InFlightMap>>,
  next_fetch_id: Arc<AtomicU64>,
  epochs: Arc<Mutex<EpochMap>>,
  generation: Arc<AtomicU64>,
  /// How long before cached data is considered stale
  stale_time: Duration,
}

impl QueryClient {
  /// Create a new query client with the given storage backend.
  pub fn new(storage: impl CacheStorage + 'static) -> Self {
    Self {
      storage: Arc::new(storage),
      in_flight: Arc::new(Mutex::new(HashMap::new())),
      next_fetch_id: Arc::new(AtomicU64::new(0)),
      epochs: Arc::new(Mutex::new(HashMap::new())),
      generation: Arc::new(AtomicU64::new(0)),
      stale_time: Duration::minutes(5),
    }
  }

  /// A client backed by a fresh in-memory store.
  pub fn in_memory() -> Self {
    Self::new(MemoryStorage::new())
  }

  /// Set the stale time for cached data.
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  pub fn stale_time(&self) -> Duration {
    self.stale_time
  }

  pub fn storage(&self) -> &dyn CacheStorage {
    self.storage.as_ref()
  }

  /// Read cached data without fetching, fresh or not.
  pub fn get_query_data<T: DeserializeOwned>(&self, key: &impl QueryKey) -> Option<T> {
    let entry = self.storage.get(&key.cache_key())?;
    serde_json::from_value(entry.value).ok()
  }

  /// Seed or overwrite cached data.
  pub fn set_query_data<T: Serialize>(
    &self,
    key: &impl QueryKey,
    data: &T,
    ttl: Option<Duration>,
  ) -> Result<()> {
    let value = serde_json::to_value(data)?;
    self.storage.set(&key.cache_key(), value, ttl);
    Ok(())
  }

  /// Whether the entry for this exact key has been invalidated since its
  /// last write. Missing entries are not considered invalidated.
  pub fn is_invalidated(&self, key: &CacheKey) -> bool {
    self
      .storage
      .get(key)
      .map(|entry| entry.invalidated)
      .unwrap_or(false)
  }

  /// Latest invalidation covering `key`, 0 if it was never invalidated.
  ///
  /// Observers record this before fetching; a higher value later means the
  /// data they got may predate a write.
  pub fn invalidation_epoch(&self, key: &CacheKey) -> u64 {
    lock(&self.epochs)
      .iter()
      .filter(|(prefix, _)| key.starts_with(prefix))
      .map(|(_, epoch)| *epoch)
      .max()
      .unwrap_or(0)
  }

  /// Whether a fetch is currently in flight for this exact key.
  pub fn is_fetching(&self, key: &CacheKey) -> bool {
    lock(&self.in_flight).contains_key(key)
  }

  /// Mark every query under `key` stale so the next read refetches.
  ///
  /// Idempotent: repeated invalidations before a read still cause one refetch.
  pub fn invalidate_queries(&self, key: &impl QueryKey) -> usize {
    let prefix = key.cache_key();
    let epoch = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
    lock(&self.epochs).insert(prefix.clone(), epoch);
    let forgotten = {
      let mut in_flight = lock(&self.in_flight);
      let before = in_flight.len();
      in_flight.retain(|k, _| !k.starts_with(&prefix));
      before - in_flight.len()
    };
    let marked = self.storage.invalidate(&prefix);
    info!(
      key = %key.description(),
      epoch,
      marked,
      forgotten,
      "Invalidated queries"
    );
    marked
  }

  /// Fetch with cache-first strategy and request de-duplication.
  ///
  /// 1. Fresh cache entry - return immediately
  /// 2. A fetch for the key is already in flight - wait for it
  /// 3. Otherwise run `fetcher` and store its result
  pub async fn fetch_query<T, F, Fut>(
    &self,
    key: &impl QueryKey,
    fetcher: F,
  ) -> Result<CacheResult<T>>
  where
    T: Serialize + DeserializeOwned + Send + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let cache_key = key.cache_key();

    if let Some(entry) = self.storage.get(&cache_key) {
      if entry.is_fresh(Utc::now(), self.stale_time) {
        debug!(key = %cache_key, "Cache hit");
        let data = serde_json::from_value(entry.value)?;
        return Ok(CacheResult::from_cache(data, entry.cached_at));
      }
      debug!(key = %cache_key, invalidated = entry.invalidated, "Cache entry stale");
    }

    let (fetch, joined) = self.join_or_start(&cache_key, fetcher);
    let value = fetch.await?;
    let data = serde_json::from_value(value)?;

    Ok(if joined {
      CacheResult::joined(data)
    } else {
      CacheResult::from_network(data)
    })
  }

  /// Return the in-flight fetch for `key`, starting one if there is none.
  /// The flag is true when an existing fetch was joined.
  fn join_or_start<T, F, Fut>(&self, key: &CacheKey, fetcher: F) -> (SharedFetch, bool)
  where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    let mut in_flight = lock(&self.in_flight);
    if let Some(existing) = in_flight.get(key) {
      debug!(key = %key, "Joining in-flight fetch");
      return (existing.fetch.clone(), true);
    }

    debug!(key = %key, "Cache miss, fetching");
    let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
    let future = fetcher();
    let storage = Arc::clone(&self.storage);
    let registry = Arc::clone(&self.in_flight);
    let owned_key = key.clone();

    let fetch = async move {
      let result = future
        .await
        .and_then(|data| serde_json::to_value(&data).map_err(ApiError::from));
      settle(&registry, storage.as_ref(), &owned_key, id, &result);
      result
    }
    .boxed()
    .shared();

    in_flight.insert(
      key.clone(),
      InFlight {
        id,
        fetch: fetch.clone(),
      },
    );
    (fetch, false)
  }
}

/// Finish fetch `id`: if it is still the registered fetch for `key`,
/// unregister it and cache a successful result. A fetch that was forgotten by
/// invalidation delivers to its waiters but never writes the cache.
fn settle(
  registry: &Mutex<InFlightMap>,
  storage: &dyn CacheStorage,
  key: &CacheKey,
  id: u64,
  result: &Result<Value>,
) {
  let mut in_flight = lock(registry);
  if in_flight.get(key).map(|f| f.id) != Some(id) {
    debug!(key = %key, "Discarding result of superseded fetch");
    return;
  }
  in_flight.remove(key);
  if let Ok(value) = result {
    storage.set(key, value.clone(), None);
  }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
