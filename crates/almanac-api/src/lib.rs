//! Read-only JSON API over Almanac's events.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`EventRepository`] and [`TypeRegistry`]. Transport, TLS, and request
//! tracing are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", almanac_api::api_router(Arc::new(store)))
//! ```

pub mod error;
pub mod events;
pub mod types;

use std::sync::Arc;

use almanac_core::store::{EventRepository, TypeRegistry};
use axum::{Router, routing::get};

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: EventRepository + TypeRegistry + 'static,
{
  Router::new()
    .route("/events", get(events::list::<S>))
    .route("/events/{id}", get(events::get_one::<S>))
    .route("/types", get(types::list::<S>))
    .with_state(store)
}
