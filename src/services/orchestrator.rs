//! Bulk action orchestrators.
//!
//! Each operation is a thin composition over the same spine: acquire
//! credentials, select the working list, select the case task, fan out, then
//! reconcile and write back under the operation's follow-up event. Retry
//! operations differ from first attempts only in which list they take as
//! input.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::{BulkActionError, BulkActionResult};
use crate::domain::models::{
    BulkActionAggregate, BulkActionState, BulkEvent, BulkListEntry, CaseReference, CaseTask,
    TriggerConfig,
};
use crate::domain::ports::{Credentials, CredentialsProvider, RemoteCaseStore};
use crate::services::bulk_trigger::BulkTrigger;
use crate::services::case_tasks;
use crate::services::reconciliation::{self, ReconciliationEngine};
use crate::services::validation;

/// Days between pronouncement and the decision becoming final.
const DECISION_FINAL_AFTER_DAYS: i64 = 43;

/// Outcome of one bulk action pass, as persisted into the aggregate.
#[derive(Debug, Clone)]
pub struct BulkActionOutcome {
    pub processed: Vec<BulkListEntry>,
    pub errored: Vec<BulkListEntry>,
}

impl BulkActionOutcome {
    /// Whether every case in the working list was processed.
    pub fn is_complete(&self) -> bool {
        self.errored.is_empty()
    }
}

/// Runs bulk operations against one aggregate at a time.
///
/// Callers must ensure only one action is in flight per aggregate; the engine
/// does not coordinate concurrent bulk actions against the same aggregate.
pub struct BulkActionOrchestrator<S, C> {
    credentials: Arc<C>,
    trigger: BulkTrigger<S>,
    reconciliation: ReconciliationEngine<S>,
}

impl<S, C> BulkActionOrchestrator<S, C>
where
    S: RemoteCaseStore + 'static,
    C: CredentialsProvider,
{
    pub fn new(store: Arc<S>, credentials: Arc<C>, trigger_config: TriggerConfig) -> Self {
        Self {
            credentials,
            trigger: BulkTrigger::new(store.clone(), trigger_config),
            reconciliation: ReconciliationEngine::new(store),
        }
    }

    /// Pronounce every case in the working list.
    ///
    /// On full success the aggregate moves to `Pronounced`; on partial
    /// failure it stays `Listed` with the errored subset retained for
    /// [`retry_pronounce`](Self::retry_pronounce).
    #[instrument(skip(self, aggregate), fields(bulk_id = %aggregate.id))]
    pub async fn pronounce(
        &self,
        aggregate: &mut BulkActionAggregate,
    ) -> BulkActionResult<BulkActionOutcome> {
        let working_list = aggregate.working_list();
        self.pronounce_list(aggregate, working_list).await
    }

    /// Re-attempt pronouncement for the previously errored subset only.
    #[instrument(skip(self, aggregate), fields(bulk_id = %aggregate.id))]
    pub async fn retry_pronounce(
        &self,
        aggregate: &mut BulkActionAggregate,
    ) -> BulkActionResult<BulkActionOutcome> {
        let working_list = aggregate.errored_list();
        self.pronounce_list(aggregate, working_list).await
    }

    async fn pronounce_list(
        &self,
        aggregate: &mut BulkActionAggregate,
        working_list: Vec<BulkListEntry>,
    ) -> BulkActionResult<BulkActionOutcome> {
        let mut errors = Vec::new();
        if aggregate.state != BulkActionState::Listed {
            errors.push(format!(
                "bulk action is {}, only a listed batch can be pronounced",
                aggregate.state
            ));
        }
        if working_list.is_empty() {
            errors.push("there are no cases to pronounce".to_string());
        }
        let refs: Vec<_> = working_list.iter().map(|e| e.case_reference.clone()).collect();
        errors.extend(validation::validate_duplicates(&refs));

        let judge = aggregate.pronouncement_judge.clone().unwrap_or_default();
        if judge.is_empty() {
            errors.push("no pronouncement judge is assigned".to_string());
        }
        let Some(hearing_date) = aggregate.hearing_date else {
            errors.push("no hearing date is set".to_string());
            return Err(BulkActionError::ValidationFailed(errors));
        };
        validation::ensure_valid(errors)?;

        let decision_date = hearing_date.date_naive() + Duration::days(DECISION_FINAL_AFTER_DAYS);
        let task = case_tasks::pronounce(judge, decision_date);

        let outcome = self
            .run(aggregate, &working_list, &task, BulkEvent::BulkPronounced)
            .await?;

        if outcome.is_complete() {
            aggregate.transition_to(BulkActionState::Pronounced)?;
            info!(bulk_id = %aggregate.id, "every case pronounced");
        } else {
            info!(
                bulk_id = %aggregate.id,
                errored = outcome.errored.len(),
                "pronouncement partially failed, batch stays listed for retry"
            );
        }
        Ok(outcome)
    }

    /// Move the whole batch to a new hearing slot.
    #[instrument(skip(self, aggregate), fields(bulk_id = %aggregate.id))]
    pub async fn reschedule_hearing(
        &self,
        aggregate: &mut BulkActionAggregate,
        hearing_date: DateTime<Utc>,
        court: String,
    ) -> BulkActionResult<BulkActionOutcome> {
        let mut errors = Vec::new();
        if hearing_date < Utc::now() {
            errors.push(format!("hearing date {hearing_date} is in the past"));
        }
        let refs = aggregate.case_references();
        errors.extend(validation::validate_duplicates(&refs));
        validation::ensure_valid(errors)?;

        aggregate.hearing_date = Some(hearing_date);
        aggregate.court = Some(court.clone());

        let working_list = aggregate.working_list();
        let task = case_tasks::reschedule_hearing(hearing_date, court);
        self.run(aggregate, &working_list, &task, BulkEvent::BulkHearingRescheduled)
            .await
    }

    /// Change the pronouncement judge across the whole batch.
    #[instrument(skip(self, aggregate), fields(bulk_id = %aggregate.id))]
    pub async fn reassign_judge(
        &self,
        aggregate: &mut BulkActionAggregate,
        judge: String,
    ) -> BulkActionResult<BulkActionOutcome> {
        if judge.trim().is_empty() {
            return Err(BulkActionError::ValidationFailed(vec![
                "judge name must not be empty".to_string(),
            ]));
        }

        aggregate.pronouncement_judge = Some(judge.clone());

        let working_list = aggregate.working_list();
        let task = case_tasks::reassign_judge(judge);
        self.run(aggregate, &working_list, &task, BulkEvent::BulkJudgeReassigned)
            .await
    }

    /// Remove the named cases from the batch, unlinking each one.
    ///
    /// The working list for the fan-out is exactly the entries being removed;
    /// the aggregate's case list is then shrunk by the references whose
    /// unlink succeeded, so a failed unlink keeps its case in the batch.
    #[instrument(skip(self, aggregate, to_remove), fields(bulk_id = %aggregate.id))]
    pub async fn remove_cases(
        &self,
        aggregate: &mut BulkActionAggregate,
        to_remove: &[CaseReference],
    ) -> BulkActionResult<BulkActionOutcome> {
        let mut errors = validation::validate_duplicates(to_remove);
        let listed = aggregate.case_references();
        for reference in to_remove {
            if !listed.contains(reference) {
                errors.push(format!("case {reference} is not part of this bulk action"));
            }
        }
        validation::ensure_valid(errors)?;

        let working_list: Vec<_> = aggregate
            .case_list
            .iter()
            .filter(|entry| to_remove.contains(&entry.value.case_reference))
            .map(|entry| entry.value.clone())
            .collect();

        let task = case_tasks::remove_from_bulk();
        let outcome = self
            .run_with(aggregate, &working_list, &task, BulkEvent::BulkCasesRemoved, |aggregate, outcome| {
                let removed: Vec<_> =
                    outcome.processed.iter().map(|e| e.case_reference.clone()).collect();
                aggregate
                    .case_list
                    .retain(|entry| !removed.contains(&entry.value.case_reference));
            })
            .await?;

        info!(
            bulk_id = %aggregate.id,
            removed = outcome.processed.len(),
            retained = aggregate.case_list.len(),
            "cases removed from bulk action"
        );
        Ok(outcome)
    }

    /// Shared spine: credentials, fan-out, reconcile, write back.
    async fn run(
        &self,
        aggregate: &mut BulkActionAggregate,
        working_list: &[BulkListEntry],
        task: &CaseTask,
        follow_up: BulkEvent,
    ) -> BulkActionResult<BulkActionOutcome> {
        self.run_with(aggregate, working_list, task, follow_up, |_, _| {}).await
    }

    /// As [`run`](Self::run), applying `mutate` to the aggregate between
    /// reconciliation and the single write-back so the extra mutation rides
    /// the same atomic event.
    async fn run_with<F>(
        &self,
        aggregate: &mut BulkActionAggregate,
        working_list: &[BulkListEntry],
        task: &CaseTask,
        follow_up: BulkEvent,
        mutate: F,
    ) -> BulkActionResult<BulkActionOutcome>
    where
        F: FnOnce(&mut BulkActionAggregate, &BulkActionOutcome),
    {
        let credentials = self.acquire_credentials().await?;

        let errored = self.trigger.run(working_list, task, &credentials).await;
        let partition = reconciliation::partition(working_list, &errored);
        let outcome = BulkActionOutcome {
            processed: partition.processed.clone(),
            errored: partition.errored.clone(),
        };

        mutate(aggregate, &outcome);

        self.reconciliation
            .persist(aggregate, partition, follow_up, &credentials)
            .await?;

        Ok(outcome)
    }

    async fn acquire_credentials(&self) -> BulkActionResult<Credentials> {
        self.credentials.acquire().await
    }
}
