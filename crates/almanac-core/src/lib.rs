//! Core types and trait definitions for the Almanac activity timeline.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Source clients, storage backends, and the read API all depend on it; the
//! ingestion pipeline is written purely against the traits in [`source`] and
//! [`store`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod event;
pub mod kind;
pub mod record;
pub mod registry;
pub mod source;
pub mod store;

pub use error::{Error, Result};
pub use kind::EventKind;
