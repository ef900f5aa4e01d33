//! Handlers for `/events` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/events` | Optional `limit`, `offset`, `type`, `user`, `sort`, `order` |
//! | `GET`  | `/events/:id` | 404 if not found |

use std::sync::Arc;

use almanac_core::{
  event::{EventQuery, EventView, SortField},
  store::EventRepository,
};
use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
  Asc,
  #[default]
  Desc,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Page size; defaults to [`DEFAULT_LIMIT`] and is capped at [`MAX_LIMIT`].
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
  /// Restrict to one event type, e.g. `"photo"`.
  #[serde(rename = "type")]
  pub kind:   Option<String>,
  pub user:   Option<String>,
  #[serde(default)]
  pub sort:   SortField,
  #[serde(default)]
  pub order:  Order,
}

impl TryFrom<ListParams> for EventQuery {
  type Error = ApiError;

  /// Rejects an `offset` the store cannot represent as a signed 64-bit value.
  fn try_from(p: ListParams) -> Result<Self, ApiError> {
    if let Some(offset) = p.offset
      && i64::try_from(offset).is_err()
    {
      return Err(ApiError::BadRequest(format!("offset {offset} is out of range")));
    }
    Ok(EventQuery {
      limit:     Some(p.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)),
      offset:    p.offset,
      kind:      p.kind,
      user:      p.user,
      sort:      p.sort,
      ascending: p.order == Order::Asc,
    })
  }
}

/// `GET /events[?limit=..][&offset=..][&type=..][&user=..][&sort=datetime|id|type][&order=asc|desc]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<EventView>>, ApiError>
where
  S: EventRepository,
{
  let Query(params) = params?;
  let query = EventQuery::try_from(params)?;
  let events = store.list(&query).await.map_err(ApiError::store)?;
  Ok(Json(events))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /events/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<EventView>, ApiError>
where
  S: EventRepository,
{
  let Path(id) = id?;
  let event = store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))?;
  Ok(Json(event))
}
