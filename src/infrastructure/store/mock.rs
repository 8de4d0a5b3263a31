//! In-memory case store for tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::models::{
    BulkActionAggregate, BulkEvent, CaseData, CaseEvent, CaseReference,
};
use crate::domain::ports::{CaseStoreError, Credentials, RemoteCaseStore};

/// One recorded per-case submission.
#[derive(Debug, Clone)]
pub struct RecordedCaseEvent {
    pub case_reference: CaseReference,
    pub event: CaseEvent,
    pub data: CaseData,
}

/// One recorded aggregate submission.
#[derive(Debug, Clone)]
pub struct RecordedBulkEvent {
    pub bulk_id: Uuid,
    pub event: BulkEvent,
    pub aggregate: BulkActionAggregate,
}

/// In-memory store with scripted failures and a submission journal.
///
/// Unknown case references fetch as default [`CaseData`], so tests only seed
/// cases whose contents matter.
#[derive(Default)]
pub struct MockCaseStore {
    cases: Arc<RwLock<HashMap<CaseReference, CaseData>>>,
    bulk_actions: Arc<RwLock<HashMap<Uuid, BulkActionAggregate>>>,
    failing_cases: Arc<RwLock<HashSet<CaseReference>>>,
    fail_bulk: Arc<RwLock<bool>>,
    case_events: Arc<RwLock<Vec<RecordedCaseEvent>>>,
    bulk_events: Arc<RwLock<Vec<RecordedBulkEvent>>>,
}

impl MockCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a case's data.
    pub async fn put_case(&self, reference: impl Into<CaseReference>, data: CaseData) {
        self.cases.write().await.insert(reference.into(), data);
    }

    /// Seed a bulk action aggregate.
    pub async fn put_bulk_action(&self, aggregate: BulkActionAggregate) {
        self.bulk_actions.write().await.insert(aggregate.id, aggregate);
    }

    /// Script every submission for this reference to fail.
    pub async fn fail_case(&self, reference: impl Into<CaseReference>) {
        self.failing_cases.write().await.insert(reference.into());
    }

    /// Clear a scripted failure, e.g. before a retry pass.
    pub async fn heal_case(&self, reference: impl Into<CaseReference>) {
        self.failing_cases.write().await.remove(&reference.into());
    }

    /// Script every aggregate write-back to fail.
    pub async fn fail_bulk_writes(&self) {
        *self.fail_bulk.write().await = true;
    }

    /// Successful per-case submissions, in completion order.
    pub async fn submitted_case_events(&self) -> Vec<RecordedCaseEvent> {
        self.case_events.read().await.clone()
    }

    /// Successful aggregate submissions, in completion order.
    pub async fn submitted_bulk_events(&self) -> Vec<RecordedBulkEvent> {
        self.bulk_events.read().await.clone()
    }

    /// The aggregate carried by the most recent write-back, if any.
    pub async fn last_written_aggregate(&self) -> Option<BulkActionAggregate> {
        self.bulk_events.read().await.last().map(|e| e.aggregate.clone())
    }
}

#[async_trait]
impl RemoteCaseStore for MockCaseStore {
    async fn submit_case_event(
        &self,
        case_reference: &CaseReference,
        event: CaseEvent,
        data: CaseData,
        _credentials: &Credentials,
    ) -> Result<(), CaseStoreError> {
        if self.failing_cases.read().await.contains(case_reference) {
            return Err(CaseStoreError::Unavailable(format!(
                "scripted failure for case {case_reference}"
            )));
        }

        self.cases.write().await.insert(case_reference.clone(), data.clone());
        self.case_events.write().await.push(RecordedCaseEvent {
            case_reference: case_reference.clone(),
            event,
            data,
        });
        Ok(())
    }

    async fn fetch_case(
        &self,
        case_reference: &CaseReference,
        _credentials: &Credentials,
    ) -> Result<CaseData, CaseStoreError> {
        Ok(self
            .cases
            .read()
            .await
            .get(case_reference)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_bulk_action(
        &self,
        bulk_id: Uuid,
        _credentials: &Credentials,
    ) -> Result<BulkActionAggregate, CaseStoreError> {
        self.bulk_actions
            .read()
            .await
            .get(&bulk_id)
            .cloned()
            .ok_or_else(|| CaseStoreError::NotFound(bulk_id.to_string()))
    }

    async fn submit_bulk_event(
        &self,
        bulk_id: Uuid,
        event: BulkEvent,
        aggregate: &BulkActionAggregate,
        _credentials: &Credentials,
    ) -> Result<(), CaseStoreError> {
        if *self.fail_bulk.read().await {
            return Err(CaseStoreError::Unavailable(
                "scripted bulk write-back failure".to_string(),
            ));
        }

        self.bulk_actions.write().await.insert(bulk_id, aggregate.clone());
        self.bulk_events.write().await.push(RecordedBulkEvent {
            bulk_id,
            event,
            aggregate: aggregate.clone(),
        });
        Ok(())
    }
}
