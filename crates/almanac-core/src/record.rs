//! Source records: the local mirror of one raw item from one source.
//!
//! A record is keyed by the source's own stable identifier. Once inserted,
//! `id` and `external_id` never change; the fetch stage may overwrite
//! `metadata` in place when a refetch shows the item changed. The process
//! stage only ever reads records.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mirrored source item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
  /// Surrogate key assigned by the mirror table on insert.
  pub id:          i64,
  /// The source's own identifier (media id, tweet id, permalink, …).
  pub external_id: String,
  /// Occurrence time, normalized to the process-wide time zone.
  pub datetime:    DateTime<FixedOffset>,
  /// The raw item exactly as the source returned it.
  pub metadata:    Value,
}

/// Input to [`crate::store::SourceMirrorRepository::insert`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSourceRecord {
  pub external_id: String,
  pub datetime:    DateTime<FixedOffset>,
  pub metadata:    Value,
}
