//! The Almanac ingestion pipeline.
//!
//! Two independent stages, both written against the collaborator traits in
//! [`almanac_core`]:
//!
//! - **Fetch** ([`Walker`] + [`ItemReconciler`]): walk a source's pages and
//!   insert, update, or skip each item in the source's mirror table.
//! - **Process** ([`Processor`] + [`EventReconciler`]): promote mirrored
//!   records into rendered timeline events, inserting each once and updating
//!   live metadata when it changes.
//!
//! Each run is sequential. Different sources share no state and may run in
//! parallel; two fetch runs of the *same* source must not overlap, which the
//! caller has to guarantee.

mod events;
mod process;
mod reconcile;
mod walker;

pub use events::EventReconciler;
pub use process::{ProcessOutcome, ProcessReport, Processor};
pub use reconcile::{FetchOutcome, ItemReconciler};
pub use walker::{WalkPolicy, WalkReport, Walker};
