//! Events: canonical, rendered timeline entries.
//!
//! Each event is derived from exactly one source record and is identified for
//! idempotency purposes by the pair `(type, source_id)`. The description
//! fields are written once at creation; only `metadata` may change later.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Stored event ────────────────────────────────────────────────────────────

/// An event as stored, with foreign keys unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  pub id:               i64,
  pub description:      String,
  pub description_html: String,
  /// Copied from the originating source record at creation.
  pub datetime:         DateTime<FixedOffset>,
  /// Small type-specific object, `{}` for most kinds.
  pub metadata:         Value,
  pub user_id:          i64,
  pub type_id:          i64,
  /// `SourceRecord::id` of the record this event was promoted from.
  pub source_id:        i64,
}

/// Input to [`crate::store::EventRepository::insert`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
  pub description:      String,
  pub description_html: String,
  pub datetime:         DateTime<FixedOffset>,
  pub metadata:         Value,
  pub user_id:          i64,
  pub type_id:          i64,
  pub source_id:        i64,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// The read-side projection served by the API, with the user and type
/// resolved to their names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventView {
  pub id:               i64,
  pub description:      String,
  pub description_html: String,
  pub metadata:         Value,
  pub date:             DateTime<FixedOffset>,
  pub user:             String,
  #[serde(rename = "type")]
  pub kind:             String,
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// Column an event listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
  #[default]
  Datetime,
  Id,
  Type,
}

/// Parameters for [`crate::store::EventRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
  pub limit:     Option<usize>,
  pub offset:    Option<usize>,
  /// Restrict to a type name, e.g. `"photo"`.
  pub kind:      Option<String>,
  /// Restrict to a user name.
  pub user:      Option<String>,
  pub sort:      SortField,
  pub ascending: bool,
}
