//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings carrying their offset; ordering
//! goes through `julianday()` so rows with different offsets still sort by
//! instant. Metadata is stored as compact JSON.

use almanac_core::{
  event::{Event, EventView, SortField},
  record::SourceRecord,
};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::{Error, Result};

// ─── Datetimes ───────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<FixedOffset>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(s).map_err(|source| Error::Datetime { value: s.to_owned(), source })
}

// ─── Metadata ────────────────────────────────────────────────────────────────

pub fn encode_json(v: &Value) -> String { v.to_string() }

pub fn decode_json(s: &str) -> Result<Value> { Ok(serde_json::from_str(s)?) }

// ─── Sorting ─────────────────────────────────────────────────────────────────

pub fn sort_column(field: SortField) -> &'static str {
  match field {
    SortField::Datetime => "julianday(e.datetime)",
    SortField::Id => "e.id",
    SortField::Type => "t.name",
  }
}

pub fn sort_direction(ascending: bool) -> &'static str {
  if ascending { "ASC" } else { "DESC" }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a mirror table row.
pub struct RawRecord {
  pub id:          i64,
  pub external_id: String,
  pub datetime:    String,
  pub metadata:    String,
}

impl RawRecord {
  pub const COLUMNS: &'static str = "id, external_id, datetime, metadata";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      external_id: row.get(1)?,
      datetime:    row.get(2)?,
      metadata:    row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<SourceRecord> {
    Ok(SourceRecord {
      id:          self.id,
      external_id: self.external_id,
      datetime:    decode_dt(&self.datetime)?,
      metadata:    decode_json(&self.metadata)?,
    })
  }
}

/// Raw values read directly from an `events` row.
pub struct RawEvent {
  pub id:               i64,
  pub description:      String,
  pub description_html: String,
  pub datetime:         String,
  pub metadata:         String,
  pub user_id:          i64,
  pub type_id:          i64,
  pub source_id:        i64,
}

impl RawEvent {
  pub const COLUMNS: &'static str = "e.id, e.description, e.description_html, \
     e.datetime, e.metadata, e.user_id, e.type_id, e.source_id";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      description:      row.get(1)?,
      description_html: row.get(2)?,
      datetime:         row.get(3)?,
      metadata:         row.get(4)?,
      user_id:          row.get(5)?,
      type_id:          row.get(6)?,
      source_id:        row.get(7)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:               self.id,
      description:      self.description,
      description_html: self.description_html,
      datetime:         decode_dt(&self.datetime)?,
      metadata:         decode_json(&self.metadata)?,
      user_id:          self.user_id,
      type_id:          self.type_id,
      source_id:        self.source_id,
    })
  }
}

/// Raw values for the read-side projection (`events` joined with `users` and
/// `types`).
pub struct RawEventView {
  pub id:               i64,
  pub description:      String,
  pub description_html: String,
  pub metadata:         String,
  pub datetime:         String,
  pub user:             String,
  pub kind:             String,
}

impl RawEventView {
  pub const SELECT: &'static str = "SELECT e.id, e.description, e.description_html, \
     e.metadata, e.datetime, u.name, t.name
     FROM events e
     JOIN users u ON u.id = e.user_id
     JOIN types t ON t.id = e.type_id";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      description:      row.get(1)?,
      description_html: row.get(2)?,
      metadata:         row.get(3)?,
      datetime:         row.get(4)?,
      user:             row.get(5)?,
      kind:             row.get(6)?,
    })
  }

  pub fn into_view(self) -> Result<EventView> {
    Ok(EventView {
      id:               self.id,
      description:      self.description,
      description_html: self.description_html,
      metadata:         decode_json(&self.metadata)?,
      date:             decode_dt(&self.datetime)?,
      user:             self.user,
      kind:             self.kind,
    })
  }
}
