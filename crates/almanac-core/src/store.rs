//! Repository traits consumed by the ingestion pipeline and the read API.
//!
//! The traits are implemented by storage backends (e.g.
//! `almanac-store-sqlite`). The pipeline depends on these abstractions, never
//! on a concrete backend, and receives each one explicitly.
//!
//! All methods return `Send` futures so implementations can be shared across
//! a multi-threaded async runtime (e.g. tokio with `axum`).

use std::future::Future;

use serde_json::Value;

use crate::{
  event::{Event, EventQuery, EventView, NewEvent},
  record::{NewSourceRecord, SourceRecord},
  registry::EventType,
};

// ─── Mirror ──────────────────────────────────────────────────────────────────

/// One source's mirror table, keyed by the source's external id.
///
/// Written only by the fetch stage; read by the process stage.
pub trait SourceMirrorRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up a record by the source's own identifier.
  fn find_by_external_id<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<SourceRecord>, Self::Error>> + Send + 'a;

  /// Insert a new record and return its surrogate id. Fails if the external
  /// id is already present.
  fn insert(
    &self,
    record: NewSourceRecord,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Overwrite the stored metadata of record `id`. `datetime` and
  /// `external_id` are never touched. Returns `false` if no row matched.
  fn update(
    &self,
    id: i64,
    metadata: Value,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All records, oldest first (ties broken by id).
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<SourceRecord>, Self::Error>> + Send + '_;
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Canonical event storage.
///
/// Holds at most one event per `(type, source_id)` pair. Written only by the
/// process stage; the list/get methods serve the read API.
pub trait EventRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The event promoted from source record `source_id` of type `type_name`.
  fn find_by_type_and_type_id<'a>(
    &'a self,
    type_name: &'a str,
    source_id: i64,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + 'a;

  /// Insert a new event and return its id.
  fn insert(
    &self,
    event: NewEvent,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Replace the metadata of event `id`. Description fields are immutable.
  /// Returns `false` if no row matched.
  fn update(
    &self,
    id: i64,
    metadata: Value,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Filtered, sorted, paginated listing for the read API.
  fn list<'a>(
    &'a self,
    query: &'a EventQuery,
  ) -> impl Future<Output = Result<Vec<EventView>, Self::Error>> + Send + 'a;

  /// A single event by id, or `None` if absent.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<EventView>, Self::Error>> + Send + '_;
}

// ─── Registries ──────────────────────────────────────────────────────────────

/// Event type lookup by name.
pub trait TypeRegistry: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn id_for_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  /// Every registered type, ordered by name.
  fn list_types(
    &self,
  ) -> impl Future<Output = Result<Vec<EventType>, Self::Error>> + Send + '_;
}

/// User lookup by name.
pub trait UserRegistry: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn id_for_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;
}
