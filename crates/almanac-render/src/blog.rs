//! Blog posts and blog comments.

use serde::Deserialize;
use serde_json::Value;

use crate::{Description, Result, decode, html};

/// Both feeds identify an entry by its post title and permalink.
#[derive(Deserialize)]
struct Entry {
  title:     String,
  #[serde(alias = "link")]
  permalink: String,
}

pub(crate) fn render_post(metadata: &Value) -> Result<Description> {
  let entry: Entry = decode(metadata)?;
  Ok(Description {
    text: format!("Published a blog post: {}.", entry.title),
    html: format!(
      "<p>Published a blog post: {}.</p>",
      html::link(&entry.permalink, &entry.title)
    ),
  })
}

pub(crate) fn render_comment(metadata: &Value) -> Result<Description> {
  let entry: Entry = decode(metadata)?;
  Ok(Description {
    text: format!("Commented on {}.", entry.title),
    html: format!(
      "<p>Commented on {}.</p>",
      html::link(&entry.permalink, &entry.title)
    ),
  })
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn post_links_permalink() {
    let d = render_post(&json!({
      "title": "On Walkers",
      "permalink": "https://blog.example/on-walkers",
    }))
    .unwrap();
    assert_eq!(d.text, "Published a blog post: On Walkers.");
    assert_eq!(
      d.html,
      "<p>Published a blog post: <a href=\"https://blog.example/on-walkers\" target=\"_blank\">On Walkers</a>.</p>"
    );
  }

  #[test]
  fn comment_accepts_rss_link_field() {
    let d = render_comment(&json!({
      "title": "On Walkers",
      "link": "https://blog.example/on-walkers#comment-3",
    }))
    .unwrap();
    assert_eq!(d.text, "Commented on On Walkers.");
  }
}
