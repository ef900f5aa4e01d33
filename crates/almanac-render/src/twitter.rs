//! Tweets.
//!
//! The text is passed through as-is. Entities (links, mentions, hashtags) are
//! not expanded into markup.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Description, Result, decode, html};

#[derive(Deserialize)]
struct Tweet {
  #[serde(alias = "full_text")]
  text: String,
}

pub(crate) fn render(metadata: &Value) -> Result<Description> {
  let tweet: Tweet = decode(metadata)?;
  Ok(Description {
    html: format!("<p>{}</p>", html::escape(&tweet.text)),
    text: tweet.text,
  })
}

/// `{favorites, retweets}` read from the raw tweet; absent counters are 0.
pub(crate) fn engagement(metadata: &Value) -> Value {
  let count = |pointer: &str| metadata.pointer(pointer).and_then(Value::as_i64).unwrap_or(0);
  json!({
    "favorites": count("/favorite_count"),
    "retweets":  count("/retweet_count"),
  })
}
