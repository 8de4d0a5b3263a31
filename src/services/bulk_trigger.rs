//! Bulk trigger: bounded concurrent fan-out of one task across a case list.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::domain::models::{BulkListEntry, CaseTask, TriggerConfig};
use crate::domain::ports::{Credentials, RemoteCaseStore};
use crate::services::case_trigger::CaseTrigger;

/// Fans a [`CaseTrigger`] out concurrently across a working list.
///
/// Entries are independent: no ordering is guaranteed between them and every
/// entry is attempted once fan-out starts. Per-case retry, if any, lives in
/// the store adapter, not here.
pub struct BulkTrigger<S> {
    store: Arc<S>,
    config: TriggerConfig,
}

impl<S: RemoteCaseStore + 'static> BulkTrigger<S> {
    pub fn new(store: Arc<S>, config: TriggerConfig) -> Self {
        Self { store, config }
    }

    /// Run the task against every entry and return the failed subset.
    ///
    /// Returned entries keep their original fields; only the case reference
    /// matters to the reconciliation diff that follows.
    pub async fn run(
        &self,
        list: &[BulkListEntry],
        task: &CaseTask,
        credentials: &Credentials,
    ) -> Vec<BulkListEntry> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut handles = Vec::with_capacity(list.len());
        let mut failed = Vec::new();

        for entry in list {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                // Only possible if the semaphore is closed mid-run; record
                // the entry as failed rather than aborting the batch.
                Err(_) => {
                    warn!(case_reference = %entry.case_reference, "fan-out semaphore closed");
                    failed.push(entry.clone());
                    continue;
                }
            };

            let store = self.store.clone();
            let entry = entry.clone();
            let task = task.clone();
            let credentials = credentials.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                CaseTrigger::new(store).trigger(&entry, &task, &credentials).await
            }));
        }

        for handle in futures::future::join_all(handles).await {
            match handle {
                Ok(result) => {
                    if !result.succeeded {
                        failed.push(result.entry);
                    }
                }
                Err(err) => {
                    // A panicked worker loses its entry's identity; the task
                    // closure owns the entry, so this only happens if the
                    // runtime is shutting down.
                    warn!(error = %err, "fan-out worker did not complete");
                }
            }
        }

        info!(
            total = list.len(),
            failed = failed.len(),
            task = task.name(),
            event = %task.event(),
            "bulk fan-out complete"
        );

        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::mock::MockCaseStore;
    use crate::services::case_tasks;

    fn credentials() -> Credentials {
        Credentials {
            auth_token: "user-token".to_string(),
            service_token: "service-token".to_string(),
            user_id: "caseworker-1".to_string(),
        }
    }

    fn entries(refs: &[&str]) -> Vec<BulkListEntry> {
        refs.iter().map(|r| BulkListEntry::new(*r, format!("Parties {r}"))).collect()
    }

    #[tokio::test]
    async fn all_successes_yield_empty_failed_subset() {
        let store = Arc::new(MockCaseStore::new());
        let trigger = BulkTrigger::new(store.clone(), TriggerConfig::default());
        let list = entries(&["1", "2", "3"]);

        let failed = trigger
            .run(&list, &case_tasks::remove_from_bulk(), &credentials())
            .await;

        assert!(failed.is_empty());
        assert_eq!(store.submitted_case_events().await.len(), 3);
    }

    #[tokio::test]
    async fn one_bad_case_never_blocks_the_batch() {
        let store = Arc::new(MockCaseStore::new());
        store.fail_case("2").await;
        let trigger = BulkTrigger::new(store.clone(), TriggerConfig::default());
        let list = entries(&["1", "2", "3"]);

        let failed = trigger
            .run(&list, &case_tasks::remove_from_bulk(), &credentials())
            .await;

        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].case_reference.as_str(), "2");
        // The other two entries were still attempted and succeeded.
        assert_eq!(store.submitted_case_events().await.len(), 2);
    }

    #[tokio::test]
    async fn concurrency_bound_of_one_still_attempts_every_entry() {
        let store = Arc::new(MockCaseStore::new());
        let trigger = BulkTrigger::new(store.clone(), TriggerConfig { max_concurrency: 1 });
        let list = entries(&["1", "2", "3", "4"]);

        let failed = trigger
            .run(&list, &case_tasks::remove_from_bulk(), &credentials())
            .await;

        assert!(failed.is_empty());
        assert_eq!(store.submitted_case_events().await.len(), 4);
    }
}
