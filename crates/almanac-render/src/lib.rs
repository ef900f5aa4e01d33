//! Description renderers for Almanac events.
//!
//! Turns a mirrored source item's raw metadata into the human-readable
//! `(description, description_html)` pair stored on its event. Pure and
//! synchronous; no I/O, clock, or locale dependencies, so the same metadata
//! always renders to the same bytes.
//!
//! # Quick start
//!
//! ```no_run
//! use almanac_core::EventKind;
//! use serde_json::json;
//!
//! let meta = json!({ "title": "Dune", "author_name": "Frank Herbert" });
//! let d = almanac_render::render(EventKind::Book, &meta).unwrap();
//! assert_eq!(d.text, "Read Dune by Frank Herbert.");
//! ```

pub mod error;
mod html;

mod blog;
mod book;
mod code;
mod distance;
mod photo;
mod twitter;
mod video;

use almanac_core::EventKind;
use serde::Deserialize;
use serde_json::{Value, json};

pub use error::{RenderError, Result};

// ─── Public types ────────────────────────────────────────────────────────────

/// A rendered event description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
  /// Plain-text summary.
  pub text: String,
  /// HTML fragment; every interpolated value is escaped.
  pub html: String,
}

type RenderFn = fn(&Value) -> Result<Description>;

// ─── Public API ──────────────────────────────────────────────────────────────

/// Render `metadata` (a source record's raw item) as an event of `kind`.
pub fn render(kind: EventKind, metadata: &Value) -> Result<Description> {
  renderer(kind)(metadata)
}

/// The small metadata object kept on events of kinds whose engagement
/// counters follow the source, or `None` for every other kind.
pub fn live_metadata(kind: EventKind, metadata: &Value) -> Option<Value> {
  match kind {
    EventKind::Twitter => Some(twitter::engagement(metadata)),
    _ => None,
  }
}

/// Metadata stored on a newly created event.
pub fn initial_metadata(kind: EventKind, metadata: &Value) -> Value {
  live_metadata(kind, metadata).unwrap_or_else(|| json!({}))
}

fn renderer(kind: EventKind) -> RenderFn {
  match kind {
    EventKind::Blog => blog::render_post,
    EventKind::BlogComment => blog::render_comment,
    EventKind::Book => book::render,
    EventKind::Code => code::render,
    EventKind::Distance => distance::render,
    EventKind::Photo => photo::render,
    EventKind::Twitter => twitter::render,
    EventKind::Video => video::render,
  }
}

/// Decode the borrowed metadata into a renderer's input shape.
fn decode<'a, T: Deserialize<'a>>(metadata: &'a Value) -> Result<T> {
  Ok(T::deserialize(metadata)?)
}
