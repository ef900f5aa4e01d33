//! Small HTML building helpers shared by the renderers.

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      other => out.push(other),
    }
  }
  out
}

/// An anchor opening in a new tab. Both arguments are escaped.
pub fn link(href: &str, text: &str) -> String {
  format!(
    "<a href=\"{}\" target=\"_blank\">{}</a>",
    escape(href),
    escape(text)
  )
}

/// Rewrite a leading `http:` scheme to `https:`.
pub fn https(url: &str) -> String {
  match url.strip_prefix("http:") {
    Some(rest) => format!("https:{rest}"),
    None => url.to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escapes_markup_and_quotes() {
    assert_eq!(
      escape(r#"<b>"Tom" & 'Jerry'</b>"#),
      "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
    );
  }

  #[test]
  fn https_only_touches_plain_http() {
    assert_eq!(https("http://img.example/a.jpg"), "https://img.example/a.jpg");
    assert_eq!(https("https://img.example/a.jpg"), "https://img.example/a.jpg");
    assert_eq!(https("//img.example/a.jpg"), "//img.example/a.jpg");
  }
}
