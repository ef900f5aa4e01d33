//! Shared photos.

use serde::Deserialize;
use serde_json::Value;

use crate::{Description, Result, decode, html};

#[derive(Deserialize)]
struct Media {
  #[serde(default)]
  caption: Option<Caption>,
  images:  Images,
}

#[derive(Deserialize)]
struct Caption {
  text: String,
}

#[derive(Deserialize)]
struct Images {
  standard_resolution: Image,
}

#[derive(Deserialize)]
struct Image {
  url:    String,
  width:  u32,
  height: u32,
}

pub(crate) fn render(metadata: &Value) -> Result<Description> {
  let media: Media = decode(metadata)?;

  let caption = media
    .caption
    .as_ref()
    .map(|c| first_line(&c.text))
    .unwrap_or_default();

  let text = if caption.is_empty() {
    "Shared a photo.".to_owned()
  } else {
    caption.to_owned()
  };

  let image = &media.images.standard_resolution;
  let markup = format!(
    "<img src=\"{}\" alt=\"{}\" height=\"{}\" width=\"{}\" />",
    html::escape(&image.url),
    html::escape(caption),
    image.height,
    image.width,
  );

  Ok(Description { text, html: markup })
}

fn first_line(s: &str) -> &str { s.lines().next().unwrap_or_default().trim() }

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn media(caption: Option<&str>) -> Value {
    json!({
      "id": "1_2",
      "caption": caption.map(|text| json!({ "text": text })),
      "images": {
        "standard_resolution": {
          "url": "https://cdn.example/p.jpg",
          "width": 640,
          "height": 480,
        },
      },
      "likes": { "count": 3 },
    })
  }

  #[test]
  fn caption_is_trimmed_to_its_first_line() {
    let d = render(&media(Some("  Sunset at the lake \n#nofilter #blessed"))).unwrap();
    assert_eq!(d.text, "Sunset at the lake");
    assert_eq!(
      d.html,
      "<img src=\"https://cdn.example/p.jpg\" alt=\"Sunset at the lake\" height=\"480\" width=\"640\" />"
    );
  }

  #[test]
  fn missing_caption_falls_back() {
    let d = render(&media(None)).unwrap();
    assert_eq!(d.text, "Shared a photo.");
    assert!(d.html.contains("alt=\"\""));
  }
}
