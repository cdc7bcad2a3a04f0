//! Cache storage trait and in-memory implementation.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::traits::CacheKey;

/// A single cached query result.
#[derive(Debug, Clone)]
pub struct CachedEntry {
  /// The cached data, serialized
  pub value: Value,
  /// When the entry was written
  pub cached_at: DateTime<Utc>,
  /// Per-entry freshness window; None uses the client's stale time
  pub ttl: Option<Duration>,
  /// Set by invalidation, cleared by the next write
  pub invalidated: bool,
}

impl CachedEntry {
  /// Whether the entry can be served without refetching.
  pub fn is_fresh(&self, now: DateTime<Utc>, default_stale_time: Duration) -> bool {
    !self.invalidated && now - self.cached_at <= self.ttl.unwrap_or(default_stale_time)
  }
}

/// Trait for cache storage backends.
///
/// Entries live for the process lifetime only; there is no persistence.
pub trait CacheStorage: Send + Sync {
  /// Get the entry stored under exactly this key.
  fn get(&self, key: &CacheKey) -> Option<CachedEntry>;

  /// Store a value, replacing any previous entry and clearing its invalidation.
  fn set(&self, key: &CacheKey, value: Value, ttl: Option<Duration>);

  /// Mark every entry whose key starts with `prefix` as stale.
  /// Returns how many entries were marked.
  fn invalidate(&self, prefix: &CacheKey) -> usize;

  /// Drop every entry.
  fn clear(&self);
}

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn get(&self, _key: &CacheKey) -> Option<CachedEntry> {
    None // Always miss
  }

  fn set(&self, _key: &CacheKey, _value: Value, _ttl: Option<Duration>) {}

  fn invalidate(&self, _prefix: &CacheKey) -> usize {
    0
  }

  fn clear(&self) {}
}

/// Process-lifetime in-memory storage.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<CacheKey, CachedEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CachedEntry>> {
    // Entries are plain data, so a panic elsewhere can't leave them half-written
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn len(&self) -> usize {
    self.entries().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries().is_empty()
  }
}

impl CacheStorage for MemoryStorage {
  fn get(&self, key: &CacheKey) -> Option<CachedEntry> {
    self.entries().get(key).cloned()
  }

  fn set(&self, key: &CacheKey, value: Value, ttl: Option<Duration>) {
    self.entries().insert(
      key.clone(),
      CachedEntry {
        value,
        cached_at: Utc::now(),
        ttl,
        invalidated: false,
      },
    );
  }

  fn invalidate(&self, prefix: &CacheKey) -> usize {
    let mut entries = self.entries();
    let mut marked = 0;
    for (key, entry) in entries.iter_mut() {
      if key.starts_with(prefix) {
        entry.invalidated = true;
        marked += 1;
      }
    }
    marked
  }

  fn clear(&self) {
    self.entries().clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn key(segments: &[&str]) -> CacheKey {
    CacheKey::new(segments.iter().copied())
  }

  #[test]
  fn test_set_and_get() {
    let storage = MemoryStorage::new();
    assert!(storage.get(&key(&["employees", "list"])).is_none());

    storage.set(&key(&["employees", "list"]), json!([1, 2]), None);
    let entry = storage
      .get(&key(&["employees", "list"]))
      .expect("entry was stored");
    assert_eq!(entry.value, json!([1, 2]));
    assert!(!entry.invalidated);
    assert_eq!(storage.len(), 1);
  }

  #[test]
  fn test_invalidate_by_prefix() {
    let storage = MemoryStorage::new();
    storage.set(&key(&["employees", "list"]), json!([]), None);
    storage.set(&key(&["employees", "detail", "1"]), json!({}), None);
    storage.set(&key(&["departments", "list"]), json!([]), None);

    assert_eq!(storage.invalidate(&key(&["employees"])), 2);

    let list = storage.get(&key(&["employees", "list"])).expect("kept");
    assert!(list.invalidated);
    let other = storage.get(&key(&["departments", "list"])).expect("kept");
    assert!(!other.invalidated);
  }

  #[test]
  fn test_invalidate_is_idempotent() {
    let storage = MemoryStorage::new();
    storage.set(&key(&["employees", "list"]), json!([]), None);

    storage.invalidate(&key(&["employees", "list"]));
    storage.invalidate(&key(&["employees", "list"]));

    let entry = storage.get(&key(&["employees", "list"])).expect("kept");
    assert!(entry.invalidated);
    assert_eq!(storage.len(), 1);
  }

  #[test]
  fn test_set_clears_invalidation() {
    let storage = MemoryStorage::new();
    storage.set(&key(&["employees", "list"]), json!([]), None);
    storage.invalidate(&key(&["employees"]));
    storage.set(&key(&["employees", "list"]), json!([1]), None);

    let entry = storage.get(&key(&["employees", "list"])).expect("kept");
    assert!(!entry.invalidated);
  }

  #[test]
  fn test_freshness() {
    let now = Utc::now();
    let entry = CachedEntry {
      value: json!(null),
      cached_at: now - Duration::seconds(30),
      ttl: None,
      invalidated: false,
    };
    assert!(entry.is_fresh(now, Duration::minutes(1)));
    assert!(!entry.is_fresh(now, Duration::seconds(10)));

    let with_ttl = CachedEntry {
      ttl: Some(Duration::seconds(5)),
      ..entry.clone()
    };
    assert!(!with_ttl.is_fresh(now, Duration::minutes(1)));

    let invalidated = CachedEntry {
      invalidated: true,
      ..entry
    };
    assert!(!invalidated.is_fresh(now, Duration::minutes(1)));
  }

  #[test]
  fn test_noop_storage_always_misses() {
    let storage = NoopStorage;
    storage.set(&key(&["employees"]), json!([]), None);
    assert!(storage.get(&key(&["employees"])).is_none());
    assert_eq!(storage.invalidate(&key(&["employees"])), 0);
  }
}
