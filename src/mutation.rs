//! Named write operations with an idle/pending/success/error lifecycle.
//!
//! `Mutation<V, T>` is the write-side sibling of [`crate::query::Query`]: the
//! caller hands it variables, it runs the write on the runtime, and the
//! outcome is picked up by polling from the event loop. While pending,
//! further `mutate` calls are refused, which is what keeps a form from being
//! submitted twice.

use crate::error::{ApiError, Result};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// Lifecycle of a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
  Idle,
  Pending,
  Success,
  Error(ApiError),
}

/// Outcome delivered once per `mutate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationEvent<T> {
  Succeeded(T),
  Failed(ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
  Success,
  Error,
}

/// Transient user-visible message about a finished mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub level: NotificationLevel,
  pub message: String,
}

impl Notification {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      level: NotificationLevel::Success,
      message: message.into(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      level: NotificationLevel::Error,
      message: message.into(),
    }
  }
}

/// Messages shown when a mutation finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationMessages {
  pub success: &'static str,
  /// Used when the error carries no message of its own
  pub failure: &'static str,
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

type MutateFn<V, T> = Box<dyn Fn(V) -> BoxFuture<T> + Send + Sync>;

pub struct Mutation<V, T> {
  status: MutationStatus,
  mutate_fn: MutateFn<V, T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T>>>,
  messages: MutationMessages,
}

impl<V: Send + 'static, T: Send + 'static> Mutation<V, T> {
  /// Create a mutation from a closure producing the write future.
  ///
  /// Side effects that must happen whenever the write succeeds, such as
  /// cache invalidation, belong inside the future: it runs to completion even
  /// if this handle is dropped first.
  pub fn new<F, Fut>(messages: MutationMessages, mutate_fn: F) -> Self
  where
    F: Fn(V) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    Self {
      status: MutationStatus::Idle,
      mutate_fn: Box::new(move |vars| Box::pin(mutate_fn(vars))),
      receiver: None,
      messages,
    }
  }

  pub fn status(&self) -> &MutationStatus {
    &self.status
  }

  pub fn is_pending(&self) -> bool {
    self.status == MutationStatus::Pending
  }

  pub fn messages(&self) -> MutationMessages {
    self.messages
  }

  /// Start the write. Returns false (and does nothing) while a previous call
  /// is still pending.
  pub fn mutate(&mut self, vars: V) -> bool {
    if self.is_pending() {
      return false;
    }

    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.status = MutationStatus::Pending;

    let future = (self.mutate_fn)(vars);
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the handle may have been dropped
      let _ = tx.send(result);
    });
    true
  }

  /// Poll for the outcome of a pending call. Returns the event exactly once.
  pub fn poll(&mut self) -> Option<MutationEvent<T>> {
    let receiver = self.receiver.as_mut()?;

    let result = match receiver.try_recv() {
      Ok(result) => result,
      Err(mpsc::error::TryRecvError::Empty) => return None,
      // Sender dropped without sending - the task panicked
      Err(mpsc::error::TryRecvError::Disconnected) => Err(ApiError::Network),
    };
    self.receiver = None;

    Some(match result {
      Ok(data) => {
        self.status = MutationStatus::Success;
        MutationEvent::Succeeded(data)
      }
      Err(error) => {
        self.status = MutationStatus::Error(error.clone());
        MutationEvent::Failed(error)
      }
    })
  }

  /// Notification for an outcome, falling back to the generic failure message
  /// when the error has none.
  pub fn notification(&self, event: &MutationEvent<T>) -> Notification {
    match event {
      MutationEvent::Succeeded(_) => Notification::success(self.messages.success),
      MutationEvent::Failed(error) => {
        Notification::error(error.message().unwrap_or(self.messages.failure))
      }
    }
  }

  /// Forget the last outcome. Ignored while pending.
  pub fn reset(&mut self) {
    if !self.is_pending() {
      self.status = MutationStatus::Idle;
    }
  }
}

impl<V, T> std::fmt::Debug for Mutation<V, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Mutation")
      .field("status", &self.status)
      .field("messages", &self.messages)
      .finish_non_exhaustive()
  }
}
