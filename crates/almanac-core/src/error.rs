//! Error types for `almanac-core`.
//!
//! [`Error`] is the run-level failure of a fetch or process job. Anything
//! that reaches a caller as an `Error` has already aborted the run; items
//! that are merely skipped never surface here.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// The source API was unreachable, answered with a non-success status, or
  /// returned a body that could not be parsed.
  #[error("transport error: {0}")]
  Transport(#[source] BoxError),

  /// A repository rejected a read or write.
  #[error("storage error: {0}")]
  Storage(#[source] BoxError),

  #[error("unknown event kind: {0:?}")]
  UnknownKind(String),

  #[error("event type {0:?} is not registered")]
  UnknownType(String),

  #[error("user {0:?} is not registered")]
  UnknownUser(String),
}

impl Error {
  pub fn transport(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Transport(Box::new(e))
  }

  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
