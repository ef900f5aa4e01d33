//! GitHub activity events.
//!
//! Only a handful of public event types are described; anything else is an
//! unknown entry type and the record is skipped.

use serde::Deserialize;
use serde_json::Value;

use crate::{Description, RenderError, Result, decode, html};

#[derive(Deserialize)]
struct Tagged<'a> {
  #[serde(rename = "type", borrow)]
  kind: &'a str,
}

#[derive(Deserialize)]
struct Repo {
  name: String,
}

impl Repo {
  fn url(&self) -> String { format!("https://github.com/{}", self.name) }

  fn link(&self) -> String { html::link(&self.url(), &self.name) }
}

#[derive(Deserialize)]
struct Envelope<P> {
  repo:    Repo,
  payload: P,
}

#[derive(Deserialize)]
struct CreatePayload {
  #[serde(rename = "ref", default)]
  git_ref:  Option<String>,
  ref_type: String,
}

#[derive(Deserialize)]
struct ForkPayload {
  forkee: Forkee,
}

#[derive(Deserialize)]
struct Forkee {
  full_name: String,
}

#[derive(Deserialize)]
struct PullRequestPayload {
  action:       String,
  number:       u64,
  pull_request: PullRequest,
}

#[derive(Deserialize)]
struct PullRequest {
  html_url: String,
}

#[derive(Deserialize)]
struct PushPayload {
  #[serde(default)]
  commits: Vec<Commit>,
}

#[derive(Deserialize)]
struct Commit {
  sha:     String,
  message: String,
}

pub(crate) fn render(metadata: &Value) -> Result<Description> {
  let tagged: Tagged = decode(metadata)?;
  match tagged.kind {
    "CreateEvent" => render_create(decode(metadata)?),
    "ForkEvent" => render_fork(decode(metadata)?),
    "PullRequestEvent" => render_pull_request(decode(metadata)?),
    "PushEvent" => render_push(decode(metadata)?),
    other => Err(RenderError::UnknownEntryType(other.to_owned())),
  }
}

fn render_create(event: Envelope<CreatePayload>) -> Result<Description> {
  let repo = &event.repo;
  let git_ref = event.payload.git_ref.as_deref().unwrap_or_default();

  match event.payload.ref_type.as_str() {
    "repository" => Ok(Description {
      text: format!("Created repository {}.", repo.name),
      html: format!("<p>Created repository {}.</p>", repo.link()),
    }),
    noun @ ("branch" | "tag") => Ok(Description {
      text: format!("Created {noun} {git_ref} at {}.", repo.name),
      html: format!(
        "<p>Created {noun} {} at {}.</p>",
        html::escape(git_ref),
        repo.link()
      ),
    }),
    other => Err(RenderError::UnknownEntryType(format!("CreateEvent/{other}"))),
  }
}

fn render_fork(event: Envelope<ForkPayload>) -> Result<Description> {
  let forkee = &event.payload.forkee.full_name;
  Ok(Description {
    text: format!("Forked {} to {forkee}.", event.repo.name),
    html: format!(
      "<p>Forked {} to {}.</p>",
      event.repo.link(),
      html::link(&format!("https://github.com/{forkee}"), forkee)
    ),
  })
}

fn render_pull_request(event: Envelope<PullRequestPayload>) -> Result<Description> {
  let payload = &event.payload;
  let action = capitalize(&payload.action);
  let label = format!("pull request #{}", payload.number);

  Ok(Description {
    text: format!("{action} {label} at {}.", event.repo.name),
    html: format!(
      "<p>{} {} at {}.</p>",
      html::escape(&action),
      html::link(&payload.pull_request.html_url, &label),
      event.repo.link()
    ),
  })
}

fn render_push(event: Envelope<PushPayload>) -> Result<Description> {
  let repo = &event.repo;
  let mut markup = format!("<p>Pushed some code at {}.</p>", repo.link());

  if !event.payload.commits.is_empty() {
    markup.push_str("<ul>");
    for commit in &event.payload.commits {
      let short: String = commit.sha.chars().take(7).collect();
      let summary = commit.message.lines().next().unwrap_or_default();
      markup.push_str(&format!(
        "<li>{} {}</li>",
        html::link(&format!("{}/commit/{}", repo.url(), commit.sha), &short),
        html::escape(summary)
      ));
    }
    markup.push_str("</ul>");
  }

  Ok(Description {
    text: format!("Pushed some code at {}.", repo.name),
    html: markup,
  })
}

fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
