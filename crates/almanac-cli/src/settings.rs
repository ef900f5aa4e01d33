//! Runtime configuration, read from a TOML file overlaid by `ALMANAC_*`
//! environment variables.
//!
//! ```toml
//! store_path = "~/.local/share/almanac/almanac.sqlite"
//! user       = "Jane"
//! timezone   = "America/Phoenix"
//!
//! [sources.twitter]
//! url             = "https://api.twitter.com/1.1/statuses/user_timeline.json"
//! query           = [{ name = "screen_name", value = "jane" }, { name = "count", value = "200" }]
//! headers         = [{ name = "Authorization", value = "Bearer ..." }]
//! id              = "/id_str"
//! datetime        = "/created_at"
//! datetime_format = "%a %b %d %H:%M:%S %z %Y"
//! pagination      = "max_id"
//! ```
//!
//! Query parameters and headers are lists of `{ name, value }` entries rather
//! than tables, because the loader lowercases table keys and many APIs expect
//! camelCase parameter names.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use almanac_core::{EventKind, kind::Termination, source::Pagination};
use anyhow::{Context as _, anyhow};
use chrono_tz::Tz;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

// ─── Settings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// The single account every event is attributed to.
  pub user:       String,
  /// Zone fetched datetimes are normalized to.
  #[serde(default = "default_timezone")]
  pub timezone:   Tz,
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// Per-source client configuration, keyed by kind name.
  #[serde(default)]
  pub sources:    BTreeMap<String, SourceConfig>,
}

fn default_store_path() -> PathBuf { PathBuf::from("almanac.sqlite") }
fn default_timezone() -> Tz { Tz::UTC }
fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::build(
      Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix("ALMANAC")),
    )
  }

  fn build(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
    let mut settings: Settings = builder
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }

  /// The client configuration for `kind`.
  pub fn source(&self, kind: EventKind) -> anyhow::Result<&SourceConfig> {
    self
      .sources
      .get(kind.type_name())
      .ok_or_else(|| anyhow!("no source configured for {kind}"))
  }

  /// Every configured kind, in name order.
  pub fn configured_kinds(&self) -> anyhow::Result<Vec<EventKind>> {
    self
      .sources
      .keys()
      .map(|name| EventKind::parse(name).with_context(|| format!("in [sources.{name}]")))
      .collect()
  }
}

// ─── Sources ─────────────────────────────────────────────────────────────────

/// How to talk to one JSON source API and pick items out of its responses.
///
/// Every field named as a pointer is an RFC 6901 JSON pointer; the empty
/// string addresses the whole document.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
  pub url:             String,
  /// Fixed query parameters sent with every request.
  #[serde(default)]
  pub query:           Vec<Param>,
  #[serde(default)]
  pub headers:         Vec<Param>,
  /// Pointer to the item array within a response.
  #[serde(default)]
  pub items:           String,
  /// Pointer to an item's identifier.
  #[serde(default = "default_id")]
  pub id:              String,
  /// Pointer to an item's occurrence time.
  #[serde(default = "default_datetime")]
  pub datetime:        String,
  #[serde(default)]
  pub datetime_format: DatetimeFormat,
  #[serde(default)]
  pub pagination:      Pagination,
  /// Query parameter carrying the cursor. Defaults per pagination style.
  pub cursor_param:    Option<String>,
  /// Pointer to the continuation token (token pagination only).
  pub next_token:      Option<String>,
  /// Overrides the kind's default termination policy.
  pub termination:     Option<Termination>,
}

fn default_id() -> String { "/id".to_owned() }
fn default_datetime() -> String { "/created_at".to_owned() }

impl SourceConfig {
  pub fn cursor_param(&self) -> &str {
    if let Some(param) = &self.cursor_param {
      return param;
    }
    match self.pagination {
      Pagination::MaxId => "max_id",
      Pagination::Page => "page",
      Pagination::Token | Pagination::None => "cursor",
    }
  }

  pub fn termination(&self, kind: EventKind) -> Termination {
    self
      .termination
      .unwrap_or(kind.capabilities().termination)
  }
}

/// One query parameter or header. Both parts keep their case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Param {
  pub name:  String,
  pub value: String,
}

impl Param {
  pub fn pair(&self) -> (&str, &str) { (&self.name, &self.value) }
}

/// How a source spells its datetimes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DatetimeFormat {
  #[default]
  Rfc3339,
  /// Seconds since the epoch, as a number or a numeric string.
  Unix,
  /// A `chrono` format string. Patterns without an offset are read as UTC.
  Pattern(String),
}

impl From<String> for DatetimeFormat {
  fn from(s: String) -> Self {
    match s.as_str() {
      "rfc3339" => Self::Rfc3339,
      "unix" => Self::Unix,
      _ => Self::Pattern(s),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn parse(toml: &str) -> Settings {
    Settings::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
      .unwrap()
  }

  #[test]
  fn defaults_fill_in_missing_fields() {
    let s = parse(r#"user = "Jane""#);
    assert_eq!(s.timezone, Tz::UTC);
    assert_eq!(s.port, 8080);
    assert_eq!(s.store_path, PathBuf::from("almanac.sqlite"));
    assert!(s.sources.is_empty());
  }

  #[test]
  fn sources_parse_with_their_pagination() {
    let s = parse(
      r#"
        user     = "Jane"
        timezone = "America/Phoenix"

        [sources.twitter]
        url             = "https://api.example/timeline.json"
        id              = "/id_str"
        datetime_format = "%a %b %d %H:%M:%S %z %Y"
        pagination      = "max_id"

        [sources.photo]
        url         = "https://api.example/media"
        items       = "/data"
        datetime    = "/created_time"
        datetime_format = "unix"
        pagination  = "token"
        next_token  = "/pagination/next_max_id"
        termination = "stop_on_first_duplicate"
      "#,
    );
    assert_eq!(s.timezone, chrono_tz::America::Phoenix);
    assert_eq!(
      s.configured_kinds().unwrap(),
      [EventKind::Photo, EventKind::Twitter]
    );

    let twitter = s.source(EventKind::Twitter).unwrap();
    assert_eq!(twitter.pagination, Pagination::MaxId);
    assert_eq!(twitter.cursor_param(), "max_id");
    assert_eq!(
      twitter.datetime_format,
      DatetimeFormat::Pattern("%a %b %d %H:%M:%S %z %Y".into())
    );
    assert_eq!(twitter.termination(EventKind::Twitter), Termination::StopOnFirstDuplicate);

    let photo = s.source(EventKind::Photo).unwrap();
    assert_eq!(photo.datetime_format, DatetimeFormat::Unix);
    assert_eq!(photo.termination(EventKind::Photo), Termination::StopOnFirstDuplicate);
    assert!(s.source(EventKind::Book).is_err());
  }

  #[test]
  fn query_and_header_names_keep_their_case() {
    let s = parse(
      r#"
        user = "Jane"

        [sources.video]
        url     = "https://www.googleapis.com/youtube/v3/playlistItems"
        query   = [{ name = "playlistId", value = "PL1" }, { name = "maxResults", value = "50" }]
        headers = [{ name = "X-Goog-Api-Key", value = "Secret" }]
      "#,
    );
    let video = s.source(EventKind::Video).unwrap();
    let query: Vec<_> = video.query.iter().map(Param::pair).collect();
    assert_eq!(query, [("playlistId", "PL1"), ("maxResults", "50")]);
    assert_eq!(video.headers[0].pair(), ("X-Goog-Api-Key", "Secret"));
  }

  #[test]
  fn unknown_source_names_are_rejected() {
    let s = parse(
      r#"
        user = "Jane"
        [sources.myspace]
        url = "https://myspace.example"
      "#,
    );
    assert!(s.configured_kinds().is_err());
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    let expanded = expand_tilde(Path::new("~/almanac.sqlite"));
    assert_eq!(expanded, PathBuf::from(home).join("almanac.sqlite"));
    assert_eq!(expand_tilde(Path::new("/tmp/a")), PathBuf::from("/tmp/a"));
  }
}
