//! Async query abstraction for data fetching with caching support.
//!
//! Inspired by TanStack Query, this module provides a `Query<T>` type that
//! encapsulates async data fetching, loading states, and error handling.
//!
//! # Example
//!
//! ```ignore
//! let mut query = Query::new(move || {
//!     let gateway = gateway.clone();
//!     async move { gateway.list().await }
//! });
//!
//! // Start fetching
//! query.fetch();
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render
//! match query.state() {
//!     QueryState::Loading => render_skeleton(),
//!     QueryState::Success(data) => render_data(data),
//!     QueryState::Error(e) => render_error(e),
//!     QueryState::Idle => {}
//! }
//! ```

use crate::cache::{CacheKey, QueryClient};
use crate::error::{ApiError, Result};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::debug;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is fetching and has no data yet
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(ApiError),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&ApiError> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A boxed future that returns a Result<T, ApiError>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Async query for data fetching with state management.
///
/// Query<T> encapsulates:
/// - The fetching logic (via a closure)
/// - Loading/success/error states
/// - Async result handling via channels
/// - Optionally, a cache key to watch: once the key is invalidated the query
///   refetches on its next poll, keeping the old data visible meanwhile
///
/// Dropping a query drops its receiver, so a result arriving afterwards is
/// discarded. The fetch task itself is not aborted.
pub struct Query<T> {
  state: QueryState<T>,
  fetcher: FetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T>>>,
  fetched_at: Option<Instant>,
  watch: Option<(QueryClient, CacheKey)>,
  /// Invalidation epoch of the watched key when the last fetch started
  seen_epoch: u64,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is a closure that returns a future. It will be called
  /// each time `fetch()` or `refetch()` is invoked.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
      fetched_at: None,
      watch: None,
      seen_epoch: 0,
    }
  }

  /// Refetch automatically whenever `key` is invalidated in `client`.
  pub fn watching(mut self, client: QueryClient, key: CacheKey) -> Self {
    self.watch = Some((client, key));
    self
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  /// True only while the first fetch is running and there's no data yet.
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// True while any fetch is running, including background refetches.
  pub fn is_fetching(&self) -> bool {
    self.receiver.is_some()
  }

  /// Check if the query succeeded.
  pub fn is_success(&self) -> bool {
    self.state.is_success()
  }

  /// Check if the query failed.
  pub fn is_error(&self) -> bool {
    self.state.is_error()
  }

  /// Get the error if the query failed.
  pub fn error(&self) -> Option<&ApiError> {
    self.state.error()
  }

  /// When the current data arrived.
  pub fn fetched_at(&self) -> Option<Instant> {
    self.fetched_at
  }

  /// Start fetching data if not already fetching.
  ///
  /// This is a no-op if the query is already fetching.
  pub fn fetch(&mut self) {
    if self.is_fetching() {
      return;
    }
    self.start_fetch();
  }

  /// Force a refetch, even if already fetching or data exists.
  pub fn refetch(&mut self) {
    // Ignore any pending fetch by dropping the receiver
    self.receiver = None;
    self.start_fetch();
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let changed = self.poll_receiver();
    if !self.is_fetching() && self.is_watched_key_invalidated() {
      debug!("Watched query invalidated, refetching");
      self.start_fetch();
    }
    changed
  }

  fn poll_receiver(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    // Try to receive without blocking
    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.fetched_at = Some(Instant::now());
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending - the task panicked
        self.state = QueryState::Error(ApiError::Network);
        self.receiver = None;
        true
      }
    }
  }

  fn is_watched_key_invalidated(&self) -> bool {
    match &self.watch {
      Some((client, key)) => {
        !matches!(self.state, QueryState::Idle) && client.invalidation_epoch(key) > self.seen_epoch
      }
      None => false,
    }
  }

  /// Internal: start the fetch operation
  fn start_fetch(&mut self) {
    if let Some((client, key)) = &self.watch {
      self.seen_epoch = client.invalidation_epoch(key);
    }
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    // Background refetches keep the data on screen
    if !self.state.is_success() {
      self.state = QueryState::Loading;
    }

    let future = (self.fetcher)();
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(result);
    });
  }
}

// Query is not Clone because the fetcher is boxed and receiver is owned.

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("fetched_at", &self.fetched_at)
      .field("fetching", &self.receiver.is_some())
      .finish_non_exhaustive()
  }
}
