//! Error type for `almanac-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// SQLite rejected a statement, including unique-key violations on
  /// `external_id` and `(type_id, source_id)`.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored `metadata` column is not valid JSON.
  #[error("corrupt metadata column: {0}")]
  Metadata(#[from] serde_json::Error),

  #[error("corrupt datetime column {value:?}: {source}")]
  Datetime {
    value:  String,
    #[source]
    source: chrono::ParseError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
