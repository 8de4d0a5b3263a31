//! Single-case trigger: applies one task to one case via the remote store.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::models::{BulkListEntry, CaseTask};
use crate::domain::ports::{Credentials, RemoteCaseStore};

/// Outcome of one per-case submission. Produced once per fan-out entry and
/// consumed immediately by the bulk trigger.
#[derive(Debug, Clone)]
pub struct TriggerResult {
    pub entry: BulkListEntry,
    pub succeeded: bool,
}

/// Applies one [`CaseTask`] to one case.
///
/// Every store failure is caught here and reported as `succeeded = false`;
/// nothing propagates to the caller, so a fan-out always completes regardless
/// of any single case's outcome.
pub struct CaseTrigger<S> {
    store: Arc<S>,
}

impl<S: RemoteCaseStore> CaseTrigger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch the case, apply the task, and submit the result under the
    /// task's event.
    pub async fn trigger(
        &self,
        entry: &BulkListEntry,
        task: &CaseTask,
        credentials: &Credentials,
    ) -> TriggerResult {
        let reference = &entry.case_reference;

        let data = match self.store.fetch_case(reference, credentials).await {
            Ok(data) => data,
            Err(err) => {
                warn!(
                    case_reference = %reference,
                    event = %task.event(),
                    error = %err,
                    "failed to fetch case before applying task"
                );
                return TriggerResult { entry: entry.clone(), succeeded: false };
            }
        };

        let transformed = task.apply(data);

        match self
            .store
            .submit_case_event(reference, task.event(), transformed, credentials)
            .await
        {
            Ok(()) => {
                debug!(
                    case_reference = %reference,
                    event = %task.event(),
                    task = task.name(),
                    "case event submitted"
                );
                TriggerResult { entry: entry.clone(), succeeded: true }
            }
            Err(err) => {
                warn!(
                    case_reference = %reference,
                    event = %task.event(),
                    error = %err,
                    "case event submission failed"
                );
                TriggerResult { entry: entry.clone(), succeeded: false }
            }
        }
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

    #[tokio::test]
    async fn trigger_reports_success() {
        let store = Arc::new(MockCaseStore::new());
        let trigger = CaseTrigger::new(store.clone());
        let entry = BulkListEntry::new("1001", "Smith v Smith");

        let result = trigger
            .trigger(&entry, &case_tasks::remove_from_bulk(), &credentials())
            .await;

        assert!(result.succeeded);
        assert_eq!(result.entry.case_reference, entry.case_reference);
        assert_eq!(store.submitted_case_events().await.len(), 1);
    }

    #[tokio::test]
    async fn trigger_swallows_store_failure() {
        let store = Arc::new(MockCaseStore::new());
        store.fail_case("1001").await;
        let trigger = CaseTrigger::new(store.clone());
        let entry = BulkListEntry::new("1001", "Smith v Smith");

        let result = trigger
            .trigger(&entry, &case_tasks::remove_from_bulk(), &credentials())
            .await;

        assert!(!result.succeeded);
        assert!(store.submitted_case_events().await.is_empty());
    }
}
