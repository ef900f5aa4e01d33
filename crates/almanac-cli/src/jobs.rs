//! Fetch, process, and serve jobs, each built from [`Settings`] and an open
//! store.

use std::sync::Arc;

use almanac_core::EventKind;
use almanac_pipeline::{
  EventReconciler, ProcessReport, Processor, WalkPolicy, WalkReport, Walker,
};
use almanac_store_sqlite::SqliteStore;
use anyhow::Context as _;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{client::HttpSourceClient, settings::Settings};

/// Open the configured store and make sure the configured user exists.
pub async fn open_store(settings: &Settings) -> anyhow::Result<SqliteStore> {
  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  store
    .ensure_user(&settings.user)
    .await
    .context("failed to register user")?;
  Ok(store)
}

/// Mirror new and changed items of `kind` from its configured source.
pub async fn fetch(
  settings: &Settings,
  store: &SqliteStore,
  kind: EventKind,
) -> anyhow::Result<WalkReport> {
  let source = settings.source(kind)?;
  let client = HttpSourceClient::new(source.clone())
    .with_context(|| format!("failed to build client for {kind}"))?;

  let policy = WalkPolicy {
    pagination:  source.pagination,
    termination: source.termination(kind),
  };
  let report = Walker::new(kind, policy, settings.timezone)
    .run(&client, &store.mirror(kind), source.pagination.seed())
    .await
    .with_context(|| format!("fetching {kind}"))?;
  Ok(report)
}

/// Promote every mirrored `kind` record into events.
pub async fn process(
  settings: &Settings,
  store: &SqliteStore,
  kind: EventKind,
) -> anyhow::Result<ProcessReport> {
  let reconciler = EventReconciler::new(store, store, store, &settings.user);
  let report = Processor::new(kind, reconciler)
    .run(&store.mirror(kind))
    .await
    .with_context(|| format!("processing {kind}"))?;
  Ok(report)
}

/// Fetch then process each of `kinds` in turn.
///
/// A failing source is logged and does not stop the others. Returns the
/// kinds that failed.
pub async fn run(settings: &Settings, store: &SqliteStore, kinds: &[EventKind]) -> Vec<EventKind> {
  let mut failed = Vec::new();
  for &kind in kinds {
    let outcome: anyhow::Result<ProcessReport> = async {
      fetch(settings, store, kind).await?;
      process(settings, store, kind).await
    }
    .await;
    if let Err(e) = outcome {
      let error = format!("{e:#}");
      error!(%kind, %error, "run failed");
      failed.push(kind);
    }
  }
  failed
}

/// Serve the read API until the process is stopped.
pub async fn serve(settings: &Settings, store: SqliteStore) -> anyhow::Result<()> {
  let app = almanac_api::api_router(Arc::new(store)).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", settings.host, settings.port);

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
