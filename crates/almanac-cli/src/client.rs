//! [`HttpSourceClient`], a configurable [`SourceClient`] for JSON APIs.

use std::time::Duration;

use almanac_core::source::{Cursor, Page, Pagination, RawItem, SourceClient};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::settings::{DatetimeFormat, Param, SourceConfig};

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{url} answered {status}")]
  Status { url: String, status: StatusCode },

  #[error("response has no item array at {0:?}")]
  NoItems(String),

  #[error("item has no usable {field} at {pointer:?}")]
  MissingField { field: &'static str, pointer: String },

  #[error("cannot parse datetime {value:?}: {reason}")]
  Datetime { value: String, reason: String },
}

/// Fetches pages from one source as described by its [`SourceConfig`].
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpSourceClient {
  client: Client,
  config: SourceConfig,
}

impl HttpSourceClient {
  pub fn new(config: SourceConfig) -> Result<Self, ClientError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  /// The query parameter carrying `cursor`.
  fn cursor_query(&self, cursor: &Cursor) -> (&str, String) {
    let value = match cursor {
      Cursor::Before(id) => id.clone(),
      Cursor::Page(n) => n.to_string(),
      Cursor::Token(token) => token.clone(),
    };
    (self.config.cursor_param(), value)
  }

  /// Turn a response body into a [`Page`].
  ///
  /// "Max id" APIs return the boundary item again, so an item whose id equals
  /// a [`Cursor::Before`] cursor is dropped.
  pub fn parse_page(&self, body: &Value, cursor: Option<&Cursor>) -> Result<Page, ClientError> {
    let items = body
      .pointer(&self.config.items)
      .and_then(Value::as_array)
      .ok_or_else(|| ClientError::NoItems(self.config.items.clone()))?;

    let boundary = match cursor {
      Some(Cursor::Before(id)) => Some(id.as_str()),
      _ => None,
    };

    let mut parsed = Vec::with_capacity(items.len());
    for item in items {
      let raw = self.parse_item(item)?;
      if Some(raw.external_id.as_str()) != boundary {
        parsed.push(raw);
      }
    }

    let next = match (self.config.pagination, &self.config.next_token) {
      (Pagination::Token, Some(pointer)) => body
        .pointer(pointer)
        .and_then(scalar)
        .filter(|token| !token.is_empty())
        .map(Cursor::Token),
      _ => None,
    };

    Ok(Page { items: parsed, next })
  }

  fn parse_item(&self, item: &Value) -> Result<RawItem, ClientError> {
    let external_id = item
      .pointer(&self.config.id)
      .and_then(scalar)
      .ok_or_else(|| ClientError::MissingField {
        field:   "id",
        pointer: self.config.id.clone(),
      })?;
    let raw_datetime =
      item
        .pointer(&self.config.datetime)
        .ok_or_else(|| ClientError::MissingField {
          field:   "datetime",
          pointer: self.config.datetime.clone(),
        })?;

    Ok(RawItem {
      external_id,
      datetime: parse_datetime(&self.config.datetime_format, raw_datetime)?,
      metadata: item.clone(),
    })
  }

  /// The GET request for the page at `cursor`.
  fn request(&self, cursor: Option<&Cursor>) -> RequestBuilder {
    let query: Vec<_> = self.config.query.iter().map(Param::pair).collect();
    let mut req = self.client.get(&self.config.url).query(&query);
    if let Some(cursor) = cursor {
      req = req.query(&[self.cursor_query(cursor)]);
    }
    for (name, value) in self.config.headers.iter().map(Param::pair) {
      req = req.header(name, value);
    }
    req
  }
}

impl SourceClient for HttpSourceClient {
  type Error = ClientError;

  async fn fetch(&self, cursor: Option<Cursor>) -> Result<Page, ClientError> {
    let resp = self.request(cursor.as_ref()).send().await?;
    if !resp.status().is_success() {
      return Err(ClientError::Status {
        url:    self.config.url.clone(),
        status: resp.status(),
      });
    }
    let body: Value = resp.json().await?;
    self.parse_page(&body, cursor.as_ref())
  }
}

/// A string or number rendered as a string.
fn scalar(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

pub fn parse_datetime(
  format: &DatetimeFormat,
  value: &Value,
) -> Result<DateTime<FixedOffset>, ClientError> {
  let invalid = |reason: &str| ClientError::Datetime {
    value:  value.to_string(),
    reason: reason.to_owned(),
  };

  match format {
    DatetimeFormat::Unix => {
      let secs = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
      }
      .ok_or_else(|| invalid("expected whole seconds"))?;
      DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| invalid("out of range"))
    }
    DatetimeFormat::Rfc3339 => {
      let s = value.as_str().ok_or_else(|| invalid("expected a string"))?;
      DateTime::parse_from_rfc3339(s).map_err(|e| invalid(&e.to_string()))
    }
    DatetimeFormat::Pattern(pattern) => {
      let s = value.as_str().ok_or_else(|| invalid("expected a string"))?;
      DateTime::parse_from_str(s, pattern)
        .or_else(|_| NaiveDateTime::parse_from_str(s, pattern).map(|n| n.and_utc().fixed_offset()))
        .map_err(|e| invalid(&e.to_string()))
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn config(pagination: Pagination) -> SourceConfig {
    SourceConfig {
      url:             "https://api.example/items".into(),
      query:           Vec::new(),
      headers:         Vec::new(),
      items:           String::new(),
      id:              "/id_str".into(),
      datetime:        "/created_at".into(),
      datetime_format: DatetimeFormat::Pattern("%a %b %d %H:%M:%S %z %Y".into()),
      pagination,
      cursor_param:    None,
      next_token:      None,
      termination:     None,
    }
  }

  fn tweet(id: &str) -> Value {
    json!({ "id_str": id, "created_at": "Wed Oct 10 20:19:24 +0000 2018", "text": "hi" })
  }

  #[test]
  fn items_are_read_from_the_root_array() {
    let client = HttpSourceClient::new(config(Pagination::MaxId)).unwrap();
    let page = client
      .parse_page(&json!([tweet("2"), tweet("1")]), None)
      .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].external_id, "2");
    assert_eq!(page.items[0].datetime.to_rfc3339(), "2018-10-10T20:19:24+00:00");
    assert_eq!(page.items[0].metadata["text"], "hi");
    assert_eq!(page.next, None);
  }

  #[test]
  fn max_id_boundary_item_is_dropped() {
    let client = HttpSourceClient::new(config(Pagination::MaxId)).unwrap();
    let cursor = Cursor::Before("2".into());
    let page = client
      .parse_page(&json!([tweet("2"), tweet("1")]), Some(&cursor))
      .unwrap();

    let ids: Vec<_> = page.items.iter().map(|i| i.external_id.as_str()).collect();
    assert_eq!(ids, ["1"]);
  }

  #[test]
  fn tokens_and_nested_items() {
    let mut cfg = config(Pagination::Token);
    cfg.items = "/data".into();
    cfg.id = "/id".into();
    cfg.datetime = "/created_time".into();
    cfg.datetime_format = DatetimeFormat::Unix;
    cfg.next_token = Some("/pagination/next".into());
    let client = HttpSourceClient::new(cfg).unwrap();

    let body = json!({
      "data": [{ "id": 17, "created_time": "1539202764" }],
      "pagination": { "next": "abc" },
    });
    let page = client.parse_page(&body, None).unwrap();
    assert_eq!(page.items[0].external_id, "17");
    assert_eq!(page.items[0].datetime.timestamp(), 1_539_202_764);
    assert_eq!(page.next, Some(Cursor::Token("abc".into())));

    let last = json!({ "data": [], "pagination": { "next": "" } });
    assert_eq!(client.parse_page(&last, None).unwrap().next, None);
  }

  #[test]
  fn missing_fields_are_errors() {
    let client = HttpSourceClient::new(config(Pagination::None)).unwrap();
    let err = client
      .parse_page(&json!([{ "created_at": "x" }]), None)
      .unwrap_err();
    assert!(matches!(err, ClientError::MissingField { field: "id", .. }));

    let err = client.parse_page(&json!({ "error": "nope" }), None).unwrap_err();
    assert!(matches!(err, ClientError::NoItems(_)));
  }

  #[test]
  fn datetime_formats() {
    let rfc = parse_datetime(&DatetimeFormat::Rfc3339, &json!("2024-03-01T10:00:00-07:00")).unwrap();
    assert_eq!(rfc.offset().local_minus_utc(), -7 * 3600);

    let naive = DatetimeFormat::Pattern("%Y-%m-%d %H:%M:%S".into());
    let dt = parse_datetime(&naive, &json!("2024-03-01 10:00:00")).unwrap();
    assert_eq!(dt.to_rfc3339(), "2024-03-01T10:00:00+00:00");

    assert!(parse_datetime(&DatetimeFormat::Unix, &json!("soon")).is_err());
    assert!(parse_datetime(&DatetimeFormat::Rfc3339, &json!(12)).is_err());
  }

  #[test]
  fn requests_carry_configured_params_verbatim() {
    let mut cfg = config(Pagination::Page);
    cfg.query = vec![Param { name: "playlistId".into(), value: "PL1".into() }];
    cfg.headers = vec![Param { name: "X-Api-Key".into(), value: "k".into() }];
    let client = HttpSourceClient::new(cfg).unwrap();

    let req = client.request(Some(&Cursor::Page(2))).build().unwrap();
    assert_eq!(req.url().query(), Some("playlistId=PL1&page=2"));
    assert_eq!(req.headers()["x-api-key"], "k");
  }

  #[test]
  fn cursor_params_default_per_style() {
    let client = HttpSourceClient::new(config(Pagination::Page)).unwrap();
    assert_eq!(client.cursor_query(&Cursor::Page(3)), ("page", "3".to_owned()));

    let mut cfg = config(Pagination::Token);
    cfg.cursor_param = Some("after".into());
    let client = HttpSourceClient::new(cfg).unwrap();
    assert_eq!(client.cursor_query(&Cursor::Token("t".into())), ("after", "t".to_owned()));
  }
}
