//! Videos favorited on YouTube (playlist items).

use serde::Deserialize;
use serde_json::Value;

use crate::{Description, Result, decode, html};

#[derive(Deserialize)]
struct PlaylistItem {
  snippet: Snippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
  title:       String,
  resource_id: ResourceId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
  video_id: String,
}

pub(crate) fn render(metadata: &Value) -> Result<Description> {
  let PlaylistItem { snippet } = decode(metadata)?;
  let id = html::escape(&snippet.resource_id.video_id);

  let player = format!(
    "<iframe src=\"https://www.youtube.com/embed/{id}\" width=\"560\" height=\"315\" \
     frameborder=\"0\" allowfullscreen></iframe>"
  );
  let link = html::link(
    &format!("https://www.youtube.com/watch?v={}", snippet.resource_id.video_id),
    &snippet.title,
  );

  Ok(Description {
    text: format!("Favorited {} on YouTube.", snippet.title),
    html: format!("{player}<p>Favorited {link} on YouTube.</p>"),
  })
}
