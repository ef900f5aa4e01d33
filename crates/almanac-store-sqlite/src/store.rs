//! [`SqliteStore`], the SQLite implementation of [`EventRepository`],
//! [`TypeRegistry`], and [`UserRegistry`].

use std::path::Path;

use almanac_core::{
  EventKind,
  event::{Event, EventQuery, EventView, NewEvent},
  registry::{EventType, User},
  store::{EventRepository, TypeRegistry, UserRegistry},
};
use rusqlite::OptionalExtension as _;
use serde_json::Value;
use strum::IntoEnumIterator as _;

use crate::{
  Error, Result,
  encode::{
    RawEvent, RawEventView, encode_dt, encode_json, sort_column, sort_direction,
  },
  mirror::SqliteMirror,
  schema::{SCHEMA, SEED_TYPE, mirror_table},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Almanac store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Create every table and register every [`EventKind`] in `types`.
  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        for kind in EventKind::iter() {
          conn.execute_batch(&mirror_table(kind))?;
          conn.execute(SEED_TYPE, rusqlite::params![kind.type_name()])?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The mirror table for `kind`.
  pub fn mirror(&self, kind: EventKind) -> SqliteMirror {
    SqliteMirror { conn: self.conn.clone(), kind }
  }

  /// Register `name` as a user if absent and return the row.
  ///
  /// The pipeline never creates users; this is for process startup.
  pub async fn ensure_user(&self, name: &str) -> Result<User> {
    let name = name.to_owned();

    let user = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO users (name) VALUES (?1)",
          rusqlite::params![name],
        )?;
        let id: i64 = conn.query_row(
          "SELECT id FROM users WHERE name = ?1",
          rusqlite::params![name],
          |r| r.get(0),
        )?;
        Ok(User { id, name })
      })
      .await?;

    Ok(user)
  }

  async fn id_by_name(&self, table: &'static str, name: &str) -> Result<Option<i64>> {
    let name = name.to_owned();
    let sql = format!("SELECT id FROM {table} WHERE name = ?1");

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![name], |r| r.get(0))
          .optional()?)
      })
      .await?;

    Ok(id)
  }
}

// ─── EventRepository impl ────────────────────────────────────────────────────

impl EventRepository for SqliteStore {
  type Error = Error;

  async fn find_by_type_and_type_id(
    &self,
    type_name: &str,
    source_id: i64,
  ) -> Result<Option<Event>> {
    let sql = format!(
      "SELECT {} FROM events e
       JOIN types t ON t.id = e.type_id
       WHERE t.name = ?1 AND e.source_id = ?2",
      RawEvent::COLUMNS
    );
    let type_name = type_name.to_owned();

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![type_name, source_id], RawEvent::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn insert(&self, event: NewEvent) -> Result<i64> {
    let datetime_str = encode_dt(event.datetime);
    let metadata_str = encode_json(&event.metadata);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (
             description, description_html, datetime, metadata,
             user_id, type_id, source_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            event.description,
            event.description_html,
            datetime_str,
            metadata_str,
            event.user_id,
            event.type_id,
            event.source_id,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(id)
  }

  async fn update(&self, id: i64, metadata: Value) -> Result<bool> {
    let metadata_str = encode_json(&metadata);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE events SET metadata = ?1 WHERE id = ?2",
          rusqlite::params![metadata_str, id],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn list(&self, query: &EventQuery) -> Result<Vec<EventView>> {
    let kind = query.kind.clone();
    let user = query.user.clone();
    // SQLite treats a negative LIMIT as "no limit". Values past i64::MAX
    // saturate so they cannot wrap negative.
    let limit_val = query.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    let offset_val = query
      .offset
      .map_or(0, |o| i64::try_from(o).unwrap_or(i64::MAX));
    let direction = sort_direction(query.ascending);

    let sql = format!(
      "{}
       WHERE (?1 IS NULL OR t.name = ?1)
         AND (?2 IS NULL OR u.name = ?2)
       ORDER BY {} {direction}, e.id {direction}
       LIMIT ?3 OFFSET ?4",
      RawEventView::SELECT,
      sort_column(query.sort),
    );

    let raws: Vec<RawEventView> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![kind, user, limit_val, offset_val],
            RawEventView::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEventView::into_view).collect()
  }

  async fn get(&self, id: i64) -> Result<Option<EventView>> {
    let sql = format!("{} WHERE e.id = ?1", RawEventView::SELECT);

    let raw: Option<RawEventView> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id], RawEventView::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawEventView::into_view).transpose()
  }
}

// ─── Registries ──────────────────────────────────────────────────────────────

impl TypeRegistry for SqliteStore {
  type Error = Error;

  async fn id_for_name(&self, name: &str) -> Result<Option<i64>> {
    self.id_by_name("types", name).await
  }

  async fn list_types(&self) -> Result<Vec<EventType>> {
    let types = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, name FROM types ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| Ok(EventType { id: row.get(0)?, name: row.get(1)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(types)
  }
}

impl UserRegistry for SqliteStore {
  type Error = Error;

  async fn id_for_name(&self, name: &str) -> Result<Option<i64>> {
    self.id_by_name("users", name).await
  }
}
