//! The process stage: promote mirrored records into events.

use almanac_core::{
  Error, EventKind, Result,
  record::SourceRecord,
  store::{EventRepository, SourceMirrorRepository, TypeRegistry, UserRegistry},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::events::EventReconciler;

/// What processing one record did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
  Inserted,
  Updated,
  Unchanged,
  /// The record could not be rendered and produced no event.
  Skipped,
}

/// Tally of one process run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessReport {
  pub inserted:  usize,
  pub updated:   usize,
  pub unchanged: usize,
  pub skipped:   usize,
}

impl ProcessReport {
  fn record(&mut self, outcome: ProcessOutcome) {
    match outcome {
      ProcessOutcome::Inserted => self.inserted += 1,
      ProcessOutcome::Updated => self.updated += 1,
      ProcessOutcome::Unchanged => self.unchanged += 1,
      ProcessOutcome::Skipped => self.skipped += 1,
    }
  }
}

/// Promotes one kind's source records into events.
///
/// Each record yields at most one event. Descriptions are rendered once, at
/// creation; afterwards only live metadata (for kinds that carry it) follows
/// the source.
pub struct Processor<'a, E, T, U> {
  kind:       EventKind,
  reconciler: EventReconciler<'a, E, T, U>,
}

impl<'a, E, T, U> Processor<'a, E, T, U>
where
  E: EventRepository,
  T: TypeRegistry,
  U: UserRegistry,
{
  pub fn new(kind: EventKind, reconciler: EventReconciler<'a, E, T, U>) -> Self {
    Self { kind, reconciler }
  }

  /// Process every record currently in `mirror`.
  pub async fn run<M>(&self, mirror: &M) -> Result<ProcessReport>
  where
    M: SourceMirrorRepository,
  {
    let records = mirror.list().await.map_err(Error::storage)?;
    self.process_all(records).await
  }

  /// Process `records` in order.
  ///
  /// A record that fails to render is logged and skipped; any other error
  /// aborts the run, keeping the events already written.
  #[tracing::instrument(
    name = "process",
    skip_all,
    fields(kind = %self.kind, run = %Uuid::new_v4(), records = records.len())
  )]
  pub async fn process_all(&self, records: Vec<SourceRecord>) -> Result<ProcessReport> {
    let mut report = ProcessReport::default();
    for record in &records {
      report.record(self.process_one(record).await?);
    }

    info!(
      inserted = report.inserted,
      updated = report.updated,
      unchanged = report.unchanged,
      skipped = report.skipped,
      "process complete"
    );
    Ok(report)
  }

  async fn process_one(&self, record: &SourceRecord) -> Result<ProcessOutcome> {
    let Some(event) = self.reconciler.find(self.kind, record.id).await? else {
      let description = match almanac_render::render(self.kind, &record.metadata) {
        Ok(description) => description,
        Err(e) => {
          warn!(
            record = record.id,
            external_id = %record.external_id,
            error = %e,
            "skipping record"
          );
          return Ok(ProcessOutcome::Skipped);
        }
      };
      let metadata = almanac_render::initial_metadata(self.kind, &record.metadata);
      let id = self
        .reconciler
        .insert(self.kind, record, description, metadata)
        .await?;
      debug!(record = record.id, event = id, "event created");
      return Ok(ProcessOutcome::Inserted);
    };

    if !self.kind.capabilities().live_metadata {
      return Ok(ProcessOutcome::Unchanged);
    }
    let Some(current) = almanac_render::live_metadata(self.kind, &record.metadata) else {
      return Ok(ProcessOutcome::Unchanged);
    };
    if current == event.metadata {
      return Ok(ProcessOutcome::Unchanged);
    }

    if self.reconciler.update_metadata(&event, current).await? {
      debug!(record = record.id, event = event.id, "event metadata updated");
      Ok(ProcessOutcome::Updated)
    } else {
      Ok(ProcessOutcome::Unchanged)
    }
  }
}
