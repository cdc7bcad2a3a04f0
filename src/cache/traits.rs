//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use std::fmt;

/// Stable, hierarchical identifier of a cached query.
///
/// Keys are ordered segments, e.g. `employees:list` or
/// `employees:detail:42`. Invalidating a key also invalidates every key it is
/// a prefix of, so `employees` covers both of the above.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
  pub fn new<I, S>(segments: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(segments.into_iter().map(Into::into).collect())
  }

  pub fn segments(&self) -> &[String] {
    &self.0
  }

  /// Whether `prefix` matches the leading segments of this key
  pub fn starts_with(&self, prefix: &CacheKey) -> bool {
    self.0.starts_with(&prefix.0)
  }
}

impl fmt::Display for CacheKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0.join(":"))
  }
}

/// Trait for typed query keys that map onto a [`CacheKey`].
pub trait QueryKey {
  /// The storage key for this query
  fn cache_key(&self) -> CacheKey;

  /// Human-readable description for logs
  fn description(&self) -> String;
}

impl QueryKey for CacheKey {
  fn cache_key(&self) -> CacheKey {
    self.clone()
  }

  fn description(&self) -> String {
    self.to_string()
  }
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Fresh data from a fetch this call started.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Data from a fetch another caller had already started.
  pub fn joined(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Joined,
      cached_at: None,
    }
  }

  /// Data served from a fresh cache entry.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::CacheFresh,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// This call performed the fetch
  Network,
  /// This call waited on a fetch already in flight for the same key
  Joined,
  /// Data from cache, still considered fresh
  CacheFresh,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_prefix_matching() {
    let all = CacheKey::new(["employees"]);
    let list = CacheKey::new(["employees", "list"]);
    let detail = CacheKey::new(["employees", "detail", "42"]);

    assert!(list.starts_with(&all));
    assert!(detail.starts_with(&all));
    assert!(list.starts_with(&list));
    assert!(!detail.starts_with(&list));
    assert!(!all.starts_with(&list));
  }

  #[test]
  fn test_display() {
    let key = CacheKey::new(["employees", "detail", "42"]);
    assert_eq!(key.to_string(), "employees:detail:42");
  }
}
