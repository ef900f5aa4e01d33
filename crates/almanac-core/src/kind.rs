//! Event kinds and their per-kind capabilities.
//!
//! Every source feeds exactly one kind, and the kind name doubles as the
//! source's mirror table name and its `types` row. All per-kind behavior
//! that the pipeline needs is looked up in [`EventKind::capabilities`], so
//! adding a source means adding a variant and one table row here (plus a
//! renderer in `almanac-render`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Kind ────────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
  Blog,
  BlogComment,
  Book,
  Code,
  Distance,
  Photo,
  Twitter,
  Video,
}

impl EventKind {
  /// Parse a type name as stored in the `types` table.
  pub fn parse(name: &str) -> Result<Self> {
    name.parse().map_err(|_| Error::UnknownKind(name.to_owned()))
  }

  /// The name used for the `types` row and the event's `type` field.
  pub fn type_name(self) -> &'static str { self.into() }

  /// The mirror table holding this kind's source records.
  pub fn table(self) -> &'static str { self.type_name() }

  pub fn capabilities(self) -> Capabilities {
    use ChangePolicy::{Counters, Never};

    match self {
      Self::Photo => Capabilities {
        change:        Counters(&["/likes/count", "/comments/count"]),
        // Counters are mirrored but not yet projected onto photo events.
        live_metadata: false,
        termination:   Termination::WalkToEmptyPage,
      },
      Self::Twitter => Capabilities {
        change:        Counters(&["/favorite_count", "/retweet_count"]),
        live_metadata: true,
        termination:   Termination::StopOnFirstDuplicate,
      },
      Self::Blog
      | Self::BlogComment
      | Self::Book
      | Self::Code
      | Self::Distance
      | Self::Video => Capabilities {
        change:        Never,
        live_metadata: false,
        termination:   Termination::WalkToEmptyPage,
      },
    }
  }
}

// ─── Capabilities ────────────────────────────────────────────────────────────

/// Static per-kind behavior consulted by the fetch and process stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
  /// Decides whether a refetched item overwrites its mirrored metadata.
  pub change:        ChangePolicy,
  /// Whether existing events carry metadata that follows the source record.
  pub live_metadata: bool,
  /// Default termination policy; a source's configuration may override it.
  pub termination:   Termination,
}

/// The "has this item changed" predicate applied to an already-mirrored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangePolicy {
  /// The source has no volatile fields; a refetch never updates.
  Never,
  /// Changed when any of these JSON pointers resolves differently.
  Counters(&'static [&'static str]),
}

impl ChangePolicy {
  pub fn has_changed(&self, stored: &Value, incoming: &Value) -> bool {
    match self {
      Self::Never => false,
      Self::Counters(pointers) => pointers
        .iter()
        .any(|p| stored.pointer(p) != incoming.pointer(p)),
    }
  }
}

/// When a fetch walk stops requesting further pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
  /// Keep paging until the source returns an empty page.
  #[default]
  WalkToEmptyPage,
  /// Stop after the first page containing an already-mirrored item.
  StopOnFirstDuplicate,
}
