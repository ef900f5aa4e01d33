//! The fetch stage: walk a source's pages into its mirror table.

use almanac_core::{
  Error, EventKind, Result,
  kind::Termination,
  source::{Cursor, Pagination, SourceClient},
  store::SourceMirrorRepository,
};
use chrono_tz::Tz;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::reconcile::{FetchOutcome, ItemReconciler};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// How a source is paged and when the walk stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkPolicy {
  pub pagination:  Pagination,
  pub termination: Termination,
}

impl WalkPolicy {
  /// `pagination` with the kind's default termination.
  pub fn for_kind(kind: EventKind, pagination: Pagination) -> Self {
    Self { pagination, termination: kind.capabilities().termination }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Tally of one fetch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkReport {
  /// Requests made, including the final empty page.
  pub pages:     usize,
  pub inserted:  usize,
  pub updated:   usize,
  pub unchanged: usize,
}

impl WalkReport {
  fn record(&mut self, outcome: FetchOutcome) {
    match outcome {
      FetchOutcome::Inserted => self.inserted += 1,
      FetchOutcome::Updated => self.updated += 1,
      FetchOutcome::Unchanged => self.unchanged += 1,
    }
  }
}

// ─── Walker ──────────────────────────────────────────────────────────────────

/// Pulls every new or changed item of one source into its mirror table.
///
/// No cursor is persisted between runs: every run starts at the source's
/// current head and relies on per-item existence checks to find what is new.
/// Commits are per item, so a failed run keeps whatever it already wrote.
pub struct Walker {
  kind:       EventKind,
  policy:     WalkPolicy,
  reconciler: ItemReconciler,
}

impl Walker {
  /// `zone` is the process-wide time zone item datetimes are normalized to.
  pub fn new(kind: EventKind, policy: WalkPolicy, zone: Tz) -> Self {
    Self {
      kind,
      policy,
      reconciler: ItemReconciler::new(kind.capabilities().change, zone),
    }
  }

  /// Walk `client` from `seed`, reconciling every item into `repository`.
  ///
  /// A transport failure aborts with [`Error::Transport`], a rejected write
  /// with [`Error::Storage`]; there is no retry within a run.
  #[tracing::instrument(
    name = "fetch",
    skip_all,
    fields(kind = %self.kind, run = %Uuid::new_v4())
  )]
  pub async fn run<C, R>(
    &self,
    client: &C,
    repository: &R,
    seed: Option<Cursor>,
  ) -> Result<WalkReport>
  where
    C: SourceClient,
    R: SourceMirrorRepository,
  {
    let mut report = WalkReport::default();
    let mut cursor = seed;

    loop {
      debug!(?cursor, "fetching page");
      let page = client
        .fetch(cursor.clone())
        .await
        .map_err(Error::transport)?;
      report.pages += 1;

      let Some(last) = page.items.last() else {
        debug!("empty page; walk complete");
        break;
      };
      let derived = self.policy.pagination.advance(cursor.as_ref(), last);
      let next = page.next.or(derived);

      let mut saw_existing = false;
      for item in page.items {
        let outcome = self.reconciler.reconcile(item, repository).await?;
        saw_existing |= outcome != FetchOutcome::Inserted;
        report.record(outcome);
      }

      if self.policy.pagination == Pagination::None {
        break;
      }
      if saw_existing && self.policy.termination == Termination::StopOnFirstDuplicate {
        debug!("page contained mirrored items; stopping");
        break;
      }
      match next {
        None => break,
        Some(next) if cursor.as_ref() == Some(&next) => {
          warn!(?next, "source did not advance; stopping");
          break;
        }
        Some(next) => cursor = Some(next),
      }
    }

    info!(
      pages = report.pages,
      inserted = report.inserted,
      updated = report.updated,
      unchanged = report.unchanged,
      "fetch complete"
    );
    Ok(report)
  }
}
