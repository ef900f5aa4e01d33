//! Handler for `GET /types`.

use std::sync::Arc;

use almanac_core::{registry::EventType, store::TypeRegistry};
use axum::{Json, extract::State};

use crate::error::ApiError;

/// `GET /types`: every registered event type, ordered by name.
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<EventType>>, ApiError>
where
  S: TypeRegistry,
{
  let types = store.list_types().await.map_err(ApiError::store)?;
  Ok(Json(types))
}
