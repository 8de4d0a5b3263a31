//! Reconciliation engine: partition a working list after a fan-out and
//! persist the partition into the aggregate.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::errors::{BulkActionError, BulkActionResult};
use crate::domain::models::{build_slotted_list, BulkActionAggregate, BulkEvent, BulkListEntry};
use crate::domain::ports::{Credentials, RemoteCaseStore};

/// Succeeded/failed split of one fan-out pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub errored: Vec<BulkListEntry>,
    pub processed: Vec<BulkListEntry>,
}

/// Partition a working list against the failed subset of its fan-out.
///
/// Comparison is by case-reference value only. The fan-out rebuilds entries
/// per call, so comparing entries themselves would silently misclassify
/// every case.
pub fn partition(original: &[BulkListEntry], errored: &[BulkListEntry]) -> Partition {
    if errored.is_empty() {
        // Full success: hand the original list back untouched.
        info!("no unprocessed cases");
        return Partition { errored: Vec::new(), processed: original.to_vec() };
    }

    let errored_refs: HashSet<_> = errored.iter().map(|e| &e.case_reference).collect();
    let processed = original
        .iter()
        .filter(|entry| !errored_refs.contains(&entry.case_reference))
        .cloned()
        .collect();

    Partition { errored: errored.to_vec(), processed }
}

/// Persists reconciliation outcomes into the aggregate via a single
/// write-back event.
pub struct ReconciliationEngine<S> {
    store: Arc<S>,
}

impl<S: RemoteCaseStore> ReconciliationEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Overwrite the aggregate's errored and processed lists with the
    /// partition and submit the full mutated aggregate under `event`.
    ///
    /// The fan-out itself was not atomic, but this single write-back makes
    /// the reconciliation observably atomic to callers. Its failure is fatal:
    /// the fan-out already happened and its outcome cannot be persisted.
    pub async fn persist(
        &self,
        aggregate: &mut BulkActionAggregate,
        outcome: Partition,
        event: BulkEvent,
        credentials: &Credentials,
    ) -> BulkActionResult<()> {
        aggregate.errored_case_details = build_slotted_list(outcome.errored);
        aggregate.processed_case_details = build_slotted_list(outcome.processed);

        match self
            .store
            .submit_bulk_event(aggregate.id, event, aggregate, credentials)
            .await
        {
            Ok(()) => {
                info!(
                    bulk_id = %aggregate.id,
                    event = %event,
                    errored = aggregate.errored_case_details.len(),
                    processed = aggregate.processed_case_details.len(),
                    "reconciliation persisted"
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    bulk_id = %aggregate.id,
                    event = %event,
                    error = %err,
                    "aggregate write-back failed after fan-out"
                );
                Err(BulkActionError::AggregateWriteFailed {
                    bulk_id: aggregate.id,
                    event: event.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }
}
