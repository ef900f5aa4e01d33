//! SQL schema for the Almanac SQLite store.
//!
//! Executed once at connection startup. Every statement is idempotent, so
//! opening an existing database is a no-op. Future migrations will be gated
//! on `PRAGMA user_version`.

use almanac_core::EventKind;

/// Shared tables; the mirror tables are generated per kind by
/// [`mirror_table`].
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS types (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS users (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

-- Written only by the process stage. At most one event per
-- (type_id, source_id); source_id is the id of the originating row in the
-- mirror table named by the type.
CREATE TABLE IF NOT EXISTS events (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    description       TEXT NOT NULL,
    description_html  TEXT NOT NULL,
    datetime          TEXT NOT NULL,                 -- RFC 3339 with offset
    metadata          TEXT NOT NULL DEFAULT '{}',    -- compact JSON object
    user_id           INTEGER NOT NULL REFERENCES users(id),
    type_id           INTEGER NOT NULL REFERENCES types(id),
    source_id         INTEGER NOT NULL,
    UNIQUE (type_id, source_id)
);

CREATE INDEX IF NOT EXISTS events_datetime_idx ON events(datetime);
CREATE INDEX IF NOT EXISTS events_user_idx     ON events(user_id);

PRAGMA user_version = 1;
";

/// DDL for one source's mirror table. Written only by the fetch stage;
/// `metadata` holds the raw item verbatim.
pub fn mirror_table(kind: EventKind) -> String {
  let table = kind.table();
  format!(
    "CREATE TABLE IF NOT EXISTS {table} (
         id           INTEGER PRIMARY KEY AUTOINCREMENT,
         external_id  TEXT NOT NULL UNIQUE,
         datetime     TEXT NOT NULL,
         metadata     TEXT NOT NULL
     );"
  )
}

/// Register a kind in `types`; existing rows are left alone.
pub const SEED_TYPE: &str = "INSERT OR IGNORE INTO types (name) VALUES (?1)";
