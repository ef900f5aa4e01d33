//! Wiring for the `almanac` binary: configuration, HTTP source clients, and
//! the fetch / process / serve jobs.
//!
//! Every collaborator is constructed here and passed explicitly to the job
//! that needs it; nothing is looked up from global state.

pub mod client;
pub mod jobs;
pub mod settings;

pub use client::{ClientError, HttpSourceClient};
pub use settings::{DatetimeFormat, Settings, SourceConfig};
