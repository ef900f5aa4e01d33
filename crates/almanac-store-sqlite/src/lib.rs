//! SQLite backend for the Almanac mirror and event stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. One [`SqliteStore`] holds every table:
//! the per-source mirror tables (reached through [`SqliteStore::mirror`]),
//! the canonical `events` table, and the `types`/`users` lookups.

mod encode;
mod mirror;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use mirror::SqliteMirror;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
