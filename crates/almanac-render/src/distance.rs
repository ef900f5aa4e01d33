//! Logged workouts.

use serde::Deserialize;
use serde_json::Value;

use crate::{Description, RenderError, Result, decode, html};

#[derive(Deserialize)]
struct Entry {
  workout: Workout,
}

#[derive(Deserialize)]
struct Workout {
  activity_type: String,
  distance:      Distance,
  #[serde(default)]
  title:         Option<String>,
}

#[derive(Deserialize)]
struct Distance {
  value: f64,
  units: String,
}

pub(crate) fn render(metadata: &Value) -> Result<Description> {
  let Entry { workout } = decode(metadata)?;

  let verb = match workout.activity_type.as_str() {
    "Hiking" => "Hiked",
    "Running" => "Ran",
    "Walking" => "Walked",
    other => return Err(RenderError::UnknownEntryType(other.to_owned())),
  };

  let text = format!(
    "{verb} {} {}.",
    format_value(workout.distance.value),
    workout.distance.units
  );

  let mut markup = format!("<p>{}</p>", html::escape(&text));
  if let Some(title) = workout.title.as_deref().filter(|t| !t.trim().is_empty()) {
    markup.push_str(&format!("<p>{}</p>", html::escape(title.trim())));
  }

  Ok(Description { text, html: markup })
}

/// Two decimal places at most, without trailing zeros.
fn format_value(value: f64) -> String {
  let fixed = format!("{value:.2}");
  fixed
    .trim_end_matches('0')
    .trim_end_matches('.')
    .to_owned()
}
