//! Integration tests for `SqliteStore` against an in-memory database.

use almanac_core::{
  EventKind,
  event::{EventQuery, NewEvent, SortField},
  record::NewSourceRecord,
  store::{EventRepository, SourceMirrorRepository, TypeRegistry, UserRegistry},
};
use chrono::{DateTime, FixedOffset};
use serde_json::json;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn dt(s: &str) -> DateTime<FixedOffset> { DateTime::parse_from_rfc3339(s).unwrap() }

fn record(external_id: &str, at: &str) -> NewSourceRecord {
  NewSourceRecord {
    external_id: external_id.into(),
    datetime:    dt(at),
    metadata:    json!({ "id": external_id, "likes": { "count": 1 } }),
  }
}

// ─── Mirror tables ───────────────────────────────────────────────────────────

#[tokio::test]
async fn mirror_insert_and_find() {
  let s = store().await;
  let photos = s.mirror(EventKind::Photo);

  let id = photos
    .insert(record("media-1", "2024-03-01T10:00:00-07:00"))
    .await
    .unwrap();

  let found = photos.find_by_external_id("media-1").await.unwrap().unwrap();
  assert_eq!(found.id, id);
  assert_eq!(found.external_id, "media-1");
  assert_eq!(found.datetime, dt("2024-03-01T10:00:00-07:00"));
  assert_eq!(found.metadata["likes"]["count"], 1);
}

#[tokio::test]
async fn mirror_find_missing_returns_none() {
  let s = store().await;
  let result = s
    .mirror(EventKind::Twitter)
    .find_by_external_id("nope")
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn mirror_tables_are_separate_per_kind() {
  let s = store().await;
  s.mirror(EventKind::Photo)
    .insert(record("shared-id", "2024-03-01T10:00:00Z"))
    .await
    .unwrap();

  let in_video = s
    .mirror(EventKind::Video)
    .find_by_external_id("shared-id")
    .await
    .unwrap();
  assert!(in_video.is_none());
}

#[tokio::test]
async fn mirror_rejects_duplicate_external_id() {
  let s = store().await;
  let photos = s.mirror(EventKind::Photo);
  photos
    .insert(record("media-1", "2024-03-01T10:00:00Z"))
    .await
    .unwrap();

  let second = photos.insert(record("media-1", "2024-03-02T10:00:00Z")).await;
  assert!(second.is_err());
}

#[tokio::test]
async fn mirror_update_only_touches_metadata() {
  let s = store().await;
  let photos = s.mirror(EventKind::Photo);
  let id = photos
    .insert(record("media-1", "2024-03-01T10:00:00Z"))
    .await
    .unwrap();

  let updated = photos
    .update(id, json!({ "id": "media-1", "likes": { "count": 9 } }))
    .await
    .unwrap();
  assert!(updated);

  let found = photos.find_by_external_id("media-1").await.unwrap().unwrap();
  assert_eq!(found.id, id);
  assert_eq!(found.datetime, dt("2024-03-01T10:00:00Z"));
  assert_eq!(found.metadata["likes"]["count"], 9);
}

#[tokio::test]
async fn mirror_update_missing_row_returns_false() {
  let s = store().await;
  let updated = s
    .mirror(EventKind::Book)
    .update(404, json!({}))
    .await
    .unwrap();
  assert!(!updated);
}

#[tokio::test]
async fn mirror_list_orders_by_instant_across_offsets() {
  let s = store().await;
  let tweets = s.mirror(EventKind::Twitter);
  // 09:00-07:00 is 16:00Z, later than 15:00Z despite sorting first as text.
  tweets.insert(record("late", "2024-03-01T09:00:00-07:00")).await.unwrap();
  tweets.insert(record("early", "2024-03-01T15:00:00+00:00")).await.unwrap();

  let ids: Vec<_> = tweets
    .list()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.external_id)
    .collect();
  assert_eq!(ids, ["early", "late"]);
}

// ─── Registries ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_kind_is_registered_as_a_type() {
  let s = store().await;
  let types = s.list_types().await.unwrap();
  assert_eq!(types.len(), 8);
  assert!(types.iter().any(|t| t.name == "blog_comment"));

  let photo = TypeRegistry::id_for_name(&s, "photo").await.unwrap();
  assert!(photo.is_some());
  let missing = TypeRegistry::id_for_name(&s, "myspace").await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn ensure_user_is_idempotent() {
  let s = store().await;
  let first = s.ensure_user("Jane").await.unwrap();
  let second = s.ensure_user("Jane").await.unwrap();
  assert_eq!(first, second);

  let id = UserRegistry::id_for_name(&s, "Jane").await.unwrap();
  assert_eq!(id, Some(first.id));
  assert_eq!(UserRegistry::id_for_name(&s, "John").await.unwrap(), None);
}

#[tokio::test]
async fn reopening_a_file_keeps_type_ids() {
  let dir = std::env::temp_dir().join(format!("almanac-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("reopen.sqlite");
  let _ = std::fs::remove_file(&path);

  let first = SqliteStore::open(&path).await.unwrap();
  let before = first.list_types().await.unwrap();
  drop(first);

  let second = SqliteStore::open(&path).await.unwrap();
  let after = second.list_types().await.unwrap();
  assert_eq!(before, after);

  let _ = std::fs::remove_dir_all(&dir);
}

// ─── Events ──────────────────────────────────────────────────────────────────

async fn new_event(s: &SqliteStore, kind: EventKind, source_id: i64, at: &str) -> NewEvent {
  let user = s.ensure_user("Jane").await.unwrap();
  let type_id = TypeRegistry::id_for_name(s, kind.type_name())
    .await
    .unwrap()
    .unwrap();
  NewEvent {
    description:      format!("{kind} #{source_id}"),
    description_html: format!("<p>{kind} #{source_id}</p>"),
    datetime:         dt(at),
    metadata:         json!({}),
    user_id:          user.id,
    type_id,
    source_id,
  }
}

#[tokio::test]
async fn event_insert_and_find_by_type_and_source() {
  let s = store().await;
  let input = new_event(&s, EventKind::Photo, 7, "2024-03-01T10:00:00Z").await;
  let id = s.insert(input.clone()).await.unwrap();

  let found = s.find_by_type_and_type_id("photo", 7).await.unwrap().unwrap();
  assert_eq!(found.id, id);
  assert_eq!(found.description, input.description);
  assert_eq!(found.source_id, 7);

  assert!(s.find_by_type_and_type_id("video", 7).await.unwrap().is_none());
  assert!(s.find_by_type_and_type_id("photo", 8).await.unwrap().is_none());
}

#[tokio::test]
async fn event_type_and_source_pair_is_unique() {
  let s = store().await;
  let input = new_event(&s, EventKind::Photo, 7, "2024-03-01T10:00:00Z").await;
  s.insert(input.clone()).await.unwrap();
  assert!(s.insert(input).await.is_err());

  // Same source id under another type is a different event.
  let other = new_event(&s, EventKind::Video, 7, "2024-03-01T10:00:00Z").await;
  assert!(s.insert(other).await.is_ok());
}

#[tokio::test]
async fn event_update_replaces_metadata_only() {
  let s = store().await;
  let input = new_event(&s, EventKind::Twitter, 1, "2024-03-01T10:00:00Z").await;
  let id = s.insert(input.clone()).await.unwrap();

  assert!(s.update(id, json!({ "favorites": 3, "retweets": 1 })).await.unwrap());

  let found = s.find_by_type_and_type_id("twitter", 1).await.unwrap().unwrap();
  assert_eq!(found.metadata, json!({ "favorites": 3, "retweets": 1 }));
  assert_eq!(found.description, input.description);
  assert_eq!(found.description_html, input.description_html);
}

#[tokio::test]
async fn list_filters_sorts_and_paginates() {
  let s = store().await;
  for (kind, source_id, at) in [
    (EventKind::Photo, 1, "2024-03-01T10:00:00Z"),
    (EventKind::Twitter, 1, "2024-03-03T10:00:00Z"),
    (EventKind::Photo, 2, "2024-03-02T10:00:00Z"),
  ] {
    let input = new_event(&s, kind, source_id, at).await;
    s.insert(input).await.unwrap();
  }

  let newest_first = s.list(&EventQuery::default()).await.unwrap();
  let dates: Vec<_> = newest_first.iter().map(|e| e.date.to_rfc3339()).collect();
  assert_eq!(
    dates,
    [
      "2024-03-03T10:00:00+00:00",
      "2024-03-02T10:00:00+00:00",
      "2024-03-01T10:00:00+00:00",
    ]
  );
  assert_eq!(newest_first[0].kind, "twitter");
  assert_eq!(newest_first[0].user, "Jane");

  let photos = s
    .list(&EventQuery {
      kind: Some("photo".into()),
      ascending: true,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(photos.len(), 2);
  assert!(photos[0].date < photos[1].date);

  let page = s
    .list(&EventQuery {
      limit: Some(1),
      offset: Some(1),
      sort: SortField::Id,
      ascending: true,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].kind, "twitter");

  let nobody = s
    .list(&EventQuery { user: Some("John".into()), ..Default::default() })
    .await
    .unwrap();
  assert!(nobody.is_empty());
}

#[tokio::test]
async fn huge_offsets_and_limits_do_not_wrap() {
  let s = store().await;
  let input = new_event(&s, EventKind::Photo, 1, "2024-03-01T10:00:00Z").await;
  s.insert(input).await.unwrap();

  let past_the_end = s
    .list(&EventQuery { offset: Some(usize::MAX), ..Default::default() })
    .await
    .unwrap();
  assert!(past_the_end.is_empty());

  let unbounded = s
    .list(&EventQuery { limit: Some(usize::MAX), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(unbounded.len(), 1);
}

#[tokio::test]
async fn get_returns_view_or_none() {
  let s = store().await;
  let input = new_event(&s, EventKind::Book, 3, "2024-03-01T10:00:00Z").await;
  let id = s.insert(input).await.unwrap();

  let view = s.get(id).await.unwrap().unwrap();
  assert_eq!(view.kind, "book");
  assert_eq!(view.metadata, json!({}));
  assert!(s.get(id + 100).await.unwrap().is_none());
}
