//! Process-lifetime query cache.
//!
//! This module provides a domain-agnostic caching mechanism that:
//! - Stores serialized query results under hierarchical keys
//! - De-duplicates concurrent fetches of the same key
//! - Supports prefix invalidation so writes can mark related reads stale
//!
//! The store is an explicit object handed to whoever needs it, so tests can
//! inject a fresh one per case.

mod client;
mod storage;
mod traits;

pub use client::QueryClient;
pub use storage::{CacheStorage, CachedEntry, MemoryStorage, NoopStorage};
pub use traits::{CacheKey, CacheResult, CacheSource, QueryKey};
