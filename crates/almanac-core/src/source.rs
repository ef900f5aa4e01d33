//! The `SourceClient` trait and the page/cursor types it exchanges.

use std::future::Future;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Items and pages ─────────────────────────────────────────────────────────

/// One item as handed back by a source, before it is mirrored.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
  pub external_id: String,
  /// Occurrence time as reported by the source, in whatever offset it used.
  pub datetime:    DateTime<FixedOffset>,
  pub metadata:    Value,
}

/// A position in a source's result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
  /// Items older than the given external id ("max id" style).
  Before(String),
  /// 1-based page number.
  Page(u32),
  /// An opaque continuation token issued by the source.
  Token(String),
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
  pub items: Vec<RawItem>,
  /// Continuation supplied by the source itself, if any. When absent the
  /// walker derives the next cursor from the source's [`Pagination`] style.
  pub next:  Option<Cursor>,
}

impl Page {
  pub fn new(items: Vec<RawItem>) -> Self { Self { items, next: None } }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

/// How a source's result set is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
  /// Single-shot fetch: one call, no loop.
  #[default]
  None,
  /// Ask for items older than the last one seen.
  MaxId,
  /// Increment a page number.
  Page,
  /// Follow the continuation token the source returns.
  Token,
}

impl Pagination {
  /// Cursor for the first request of a run. No state survives between runs,
  /// so every run starts from the source's current head.
  pub fn seed(self) -> Option<Cursor> {
    match self {
      Self::Page => Some(Cursor::Page(1)),
      Self::None | Self::MaxId | Self::Token => None,
    }
  }

  /// Derive the cursor following `current`, given the last item processed.
  /// `None` ends the walk.
  pub fn advance(
    self,
    current: Option<&Cursor>,
    last: &RawItem,
  ) -> Option<Cursor> {
    match self {
      Self::None | Self::Token => None,
      Self::MaxId => Some(Cursor::Before(last.external_id.clone())),
      Self::Page => match current {
        Some(Cursor::Page(n)) => Some(Cursor::Page(n + 1)),
        _ => Some(Cursor::Page(2)),
      },
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// One external source API.
///
/// Implementations own the wire protocol: they turn a cursor into a request
/// and the response into [`RawItem`]s. A non-success response or an
/// unparseable body is an error; the walker treats it as fatal for the run.
pub trait SourceClient: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch(
    &self,
    cursor: Option<Cursor>,
  ) -> impl Future<Output = Result<Page, Self::Error>> + Send + '_;
}
