//! Insert / update / skip decision for one fetched item.

use almanac_core::{
  Error, Result,
  kind::ChangePolicy,
  record::NewSourceRecord,
  source::RawItem,
  store::SourceMirrorRepository,
};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// What reconciling one item did to the mirror table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
  Inserted,
  Updated,
  Unchanged,
}

/// Reconciles raw items against a mirror table.
///
/// The change predicate is the only per-source variability; lookup, insert,
/// and update are identical for every source.
#[derive(Debug, Clone, Copy)]
pub struct ItemReconciler {
  change: ChangePolicy,
  zone:   Tz,
}

impl ItemReconciler {
  pub fn new(change: ChangePolicy, zone: Tz) -> Self { Self { change, zone } }

  /// Mirror `item`. A storage failure is returned as [`Error::Storage`] and
  /// must abort the run.
  pub async fn reconcile<R>(&self, item: RawItem, repository: &R) -> Result<FetchOutcome>
  where
    R: SourceMirrorRepository,
  {
    let existing = repository
      .find_by_external_id(&item.external_id)
      .await
      .map_err(Error::storage)?;

    let Some(existing) = existing else {
      let datetime = item.datetime.with_timezone(&self.zone).fixed_offset();
      let id = repository
        .insert(NewSourceRecord {
          external_id: item.external_id,
          datetime,
          metadata: item.metadata,
        })
        .await
        .map_err(Error::storage)?;
      debug!(id, "inserted");
      return Ok(FetchOutcome::Inserted);
    };

    if !self.change.has_changed(&existing.metadata, &item.metadata) {
      return Ok(FetchOutcome::Unchanged);
    }

    let updated = repository
      .update(existing.id, item.metadata)
      .await
      .map_err(Error::storage)?;
    if updated {
      debug!(id = existing.id, "updated");
      Ok(FetchOutcome::Updated)
    } else {
      warn!(id = existing.id, external_id = %existing.external_id, "row vanished before update");
      Ok(FetchOutcome::Unchanged)
    }
  }
}
