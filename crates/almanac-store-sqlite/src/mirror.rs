//! [`SqliteMirror`]: one source's mirror table as a
//! [`SourceMirrorRepository`].

use almanac_core::{
  EventKind,
  record::{NewSourceRecord, SourceRecord},
  store::SourceMirrorRepository,
};
use rusqlite::OptionalExtension as _;
use serde_json::Value;

use crate::{
  Error, Result,
  encode::{RawRecord, encode_dt, encode_json},
};

/// A handle on the mirror table of a single [`EventKind`].
///
/// Obtained from [`crate::SqliteStore::mirror`]; shares the store's
/// connection, so cloning is cheap.
#[derive(Clone)]
pub struct SqliteMirror {
  pub(crate) conn: tokio_rusqlite::Connection,
  pub(crate) kind: EventKind,
}

impl SourceMirrorRepository for SqliteMirror {
  type Error = Error;

  async fn find_by_external_id(&self, external_id: &str) -> Result<Option<SourceRecord>> {
    let sql = format!(
      "SELECT {} FROM {} WHERE external_id = ?1",
      RawRecord::COLUMNS,
      self.kind.table()
    );
    let external_id = external_id.to_owned();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![external_id], RawRecord::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn insert(&self, record: NewSourceRecord) -> Result<i64> {
    let sql = format!(
      "INSERT INTO {} (external_id, datetime, metadata) VALUES (?1, ?2, ?3)",
      self.kind.table()
    );
    let datetime_str = encode_dt(record.datetime);
    let metadata_str = encode_json(&record.metadata);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          &sql,
          rusqlite::params![record.external_id, datetime_str, metadata_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(id)
  }

  async fn update(&self, id: i64, metadata: Value) -> Result<bool> {
    let sql = format!("UPDATE {} SET metadata = ?1 WHERE id = ?2", self.kind.table());
    let metadata_str = encode_json(&metadata);

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![metadata_str, id])?))
      .await?;

    Ok(changed > 0)
  }

  async fn list(&self) -> Result<Vec<SourceRecord>> {
    let sql = format!(
      "SELECT {} FROM {} ORDER BY julianday(datetime), id",
      RawRecord::COLUMNS,
      self.kind.table()
    );

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}
