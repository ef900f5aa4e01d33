//! Name ↔ id lookup rows for event types and users.
//!
//! Both tables are read-only from the pipeline's point of view; the pipeline
//! resolves names to ids at insert time and never creates rows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
  pub id:   i64,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:   i64,
  pub name: String,
}
