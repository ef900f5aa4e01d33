//! [`EventReconciler`]: the find/insert/update steps shared by every
//! per-source processor.

use almanac_core::{
  Error, EventKind, Result,
  event::{Event, NewEvent},
  record::SourceRecord,
  store::{EventRepository, TypeRegistry, UserRegistry},
};
use almanac_render::Description;
use serde_json::Value;

/// Event lookup and writes, with the type and user foreign keys resolved
/// through the registries.
///
/// Holds only borrows, so it is `Copy` and can be handed to as many
/// processors as needed.
pub struct EventReconciler<'a, E, T, U> {
  events: &'a E,
  types:  &'a T,
  users:  &'a U,
  user:   &'a str,
}

impl<E, T, U> Clone for EventReconciler<'_, E, T, U> {
  fn clone(&self) -> Self { *self }
}

impl<E, T, U> Copy for EventReconciler<'_, E, T, U> {}

impl<'a, E, T, U> EventReconciler<'a, E, T, U>
where
  E: EventRepository,
  T: TypeRegistry,
  U: UserRegistry,
{
  /// `user` names the account every event is attributed to. It must already
  /// be registered; the reconciler never creates users.
  pub fn new(events: &'a E, types: &'a T, users: &'a U, user: &'a str) -> Self {
    Self { events, types, users, user }
  }

  /// The event already promoted from `source_id`, if any.
  pub async fn find(&self, kind: EventKind, source_id: i64) -> Result<Option<Event>> {
    self
      .events
      .find_by_type_and_type_id(kind.type_name(), source_id)
      .await
      .map_err(Error::storage)
  }

  /// Create the event for `record`, copying its datetime.
  ///
  /// Fails with [`Error::UnknownType`] or [`Error::UnknownUser`] when a
  /// registry has no entry; both abort the run.
  pub async fn insert(
    &self,
    kind: EventKind,
    record: &SourceRecord,
    description: Description,
    metadata: Value,
  ) -> Result<i64> {
    let type_name = kind.type_name();
    let type_id = self
      .types
      .id_for_name(type_name)
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| Error::UnknownType(type_name.to_owned()))?;
    let user_id = self
      .users
      .id_for_name(self.user)
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| Error::UnknownUser(self.user.to_owned()))?;

    self
      .events
      .insert(NewEvent {
        description: description.text,
        description_html: description.html,
        datetime: record.datetime,
        metadata,
        user_id,
        type_id,
        source_id: record.id,
      })
      .await
      .map_err(Error::storage)
  }

  /// Replace the metadata of `event`. Returns `false` if the row is gone.
  pub async fn update_metadata(&self, event: &Event, metadata: Value) -> Result<bool> {
    self
      .events
      .update(event.id, metadata)
      .await
      .map_err(Error::storage)
  }
}
