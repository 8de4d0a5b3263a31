//! Port for the remote case store.

use async_trait::async_trait;
use uuid::Uuid;

use super::credentials::Credentials;
use super::errors::CaseStoreError;
use crate::domain::models::{BulkActionAggregate, BulkEvent, CaseData, CaseEvent, CaseReference};

/// Remote store holding individual cases and bulk action aggregates.
///
/// Both submission paths carry the store's own retry and idempotency
/// contract; callers treat a returned error as final for that attempt.
#[async_trait]
pub trait RemoteCaseStore: Send + Sync {
    /// Submit an event against one case, writing back its transformed data.
    async fn submit_case_event(
        &self,
        case_reference: &CaseReference,
        event: CaseEvent,
        data: CaseData,
        credentials: &Credentials,
    ) -> Result<(), CaseStoreError>;

    /// Fetch one case's current data.
    async fn fetch_case(
        &self,
        case_reference: &CaseReference,
        credentials: &Credentials,
    ) -> Result<CaseData, CaseStoreError>;

    /// Fetch a bulk action aggregate by id.
    async fn fetch_bulk_action(
        &self,
        bulk_id: Uuid,
        credentials: &Credentials,
    ) -> Result<BulkActionAggregate, CaseStoreError>;

    /// Submit an event against a bulk action aggregate, writing back the full
    /// mutated aggregate in one step.
    async fn submit_bulk_event(
        &self,
        bulk_id: Uuid,
        event: BulkEvent,
        aggregate: &BulkActionAggregate,
        credentials: &Credentials,
    ) -> Result<(), CaseStoreError>;
}
