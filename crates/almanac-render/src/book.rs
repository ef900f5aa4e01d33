//! Books finished, as reported by the reading-list feed.

use serde::Deserialize;
use serde_json::Value;

use crate::{Description, Result, decode, html};

#[derive(Deserialize)]
struct Book {
  title:          String,
  author_name:    String,
  #[serde(default)]
  link:           Option<String>,
  #[serde(default)]
  book_image_url: Option<String>,
}

pub(crate) fn render(metadata: &Value) -> Result<Description> {
  let book: Book = decode(metadata)?;

  let text = format!("Read {} by {}.", book.title, book.author_name);

  let title_html = match book.link.as_deref() {
    Some(href) => html::link(href, &book.title),
    None => html::escape(&book.title),
  };

  let mut markup = String::new();
  if let Some(src) = book.book_image_url.as_deref().filter(|s| !s.is_empty()) {
    markup.push_str(&format!(
      "<img src=\"{}\" alt=\"Cover of {}\" />",
      html::escape(&html::https(src)),
      html::escape(&book.title),
    ));
  }
  markup.push_str(&format!(
    "<p>Read {title_html} by {}.</p>",
    html::escape(&book.author_name)
  ));

  Ok(Description { text, html: markup })
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn cover_image_is_upgraded_to_https() {
    let d = render(&json!({
      "title": "Dune",
      "author_name": "Frank Herbert",
      "link": "https://books.example/dune",
      "book_image_url": "http://covers.example/dune.jpg",
    }))
    .unwrap();

    assert_eq!(d.text, "Read Dune by Frank Herbert.");
    assert_eq!(
      d.html,
      "<img src=\"https://covers.example/dune.jpg\" alt=\"Cover of Dune\" />\
       <p>Read <a href=\"https://books.example/dune\" target=\"_blank\">Dune</a> by Frank Herbert.</p>"
    );
  }

  #[test]
  fn missing_cover_and_link_render_plain_title() {
    let d = render(&json!({ "title": "Emma", "author_name": "Jane Austen" })).unwrap();
    assert_eq!(d.html, "<p>Read Emma by Jane Austen.</p>");
  }

  #[test]
  fn missing_author_is_malformed() {
    assert!(render(&json!({ "title": "Emma" })).is_err());
  }
}
