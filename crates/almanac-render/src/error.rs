//! Error type for the renderers.
//!
//! A [`RenderError`] always means "this one item cannot be described"; the
//! process stage logs it and moves on to the next record.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
  /// The item carries a discriminator outside the renderer's closed set,
  /// e.g. a workout activity or GitHub event type we do not describe.
  #[error("skipping unknown entry type: {0}")]
  UnknownEntryType(String),

  /// The metadata does not have the shape the renderer expects.
  #[error("malformed metadata: {0}")]
  Malformed(#[from] serde_json::Error),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
