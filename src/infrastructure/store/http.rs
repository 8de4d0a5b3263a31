//! HTTP adapter for the remote case store.

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::domain::models::{
    BulkActionAggregate, BulkEvent, CaseData, CaseEvent, CaseReference, StoreConfig,
};
use crate::domain::ports::{CaseStoreError, Credentials, RemoteCaseStore};

use super::retry::RetryPolicy;

/// HTTP client for the case store API.
///
/// Carries the store's own retry contract: every submission runs under an
/// exponential-backoff [`RetryPolicy`], so callers see one final outcome per
/// attempt.
pub struct HttpCaseStore {
    http_client: ReqwestClient,
    base_url: String,
    timeout_secs: u64,
    retry_policy: RetryPolicy,
}

impl HttpCaseStore {
    pub fn new(config: &StoreConfig) -> Result<Self, CaseStoreError> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .map_err(|err| CaseStoreError::Network(err.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            retry_policy: RetryPolicy::from_config(&config.retry),
        })
    }

    fn classify(&self, err: reqwest::Error) -> CaseStoreError {
        if err.is_timeout() {
            CaseStoreError::Timeout(self.timeout_secs)
        } else {
            CaseStoreError::Network(err.to_string())
        }
    }

    async fn check_status(&self, response: Response) -> Result<Response, CaseStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => CaseStoreError::NotFound(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CaseStoreError::Unauthorized(body),
            StatusCode::CONFLICT => CaseStoreError::Conflict(body),
            status if status.is_client_error() => {
                CaseStoreError::Rejected(format!("{status}: {body}"))
            }
            status => CaseStoreError::Unavailable(format!("{status}: {body}")),
        })
    }

    fn authorized(
        &self,
        request: reqwest::RequestBuilder,
        credentials: &Credentials,
    ) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&credentials.auth_token)
            .header("ServiceAuthorization", &credentials.service_token)
            .header("user-id", &credentials.user_id)
    }
}

#[async_trait]
impl RemoteCaseStore for HttpCaseStore {
    async fn submit_case_event(
        &self,
        case_reference: &CaseReference,
        event: CaseEvent,
        data: CaseData,
        credentials: &Credentials,
    ) -> Result<(), CaseStoreError> {
        let url = format!(
            "{}/cases/{}/events/{}",
            self.base_url,
            case_reference,
            event.as_str()
        );
        let url = &url;
        let data = &data;

        self.retry_policy
            .execute(move || async move {
                let response = self
                    .authorized(self.http_client.post(url), credentials)
                    .json(data)
                    .send()
                    .await
                    .map_err(|err| self.classify(err))?;
                self.check_status(response).await?;
                debug!(case_reference = %case_reference, event = %event, "case event accepted");
                Ok(())
            })
            .await
    }

    async fn fetch_case(
        &self,
        case_reference: &CaseReference,
        credentials: &Credentials,
    ) -> Result<CaseData, CaseStoreError> {
        let url = format!("{}/cases/{}", self.base_url, case_reference);
        let url = &url;

        self.retry_policy
            .execute(move || async move {
                let response = self
                    .authorized(self.http_client.get(url), credentials)
                    .send()
                    .await
                    .map_err(|err| self.classify(err))?;
                let response = self.check_status(response).await?;
                response
                    .json::<CaseData>()
                    .await
                    .map_err(|err| CaseStoreError::Rejected(format!("malformed case data: {err}")))
            })
            .await
    }

    async fn fetch_bulk_action(
        &self,
        bulk_id: Uuid,
        credentials: &Credentials,
    ) -> Result<BulkActionAggregate, CaseStoreError> {
        let url = format!("{}/bulk-actions/{}", self.base_url, bulk_id);
        let url = &url;

        self.retry_policy
            .execute(move || async move {
                let response = self
                    .authorized(self.http_client.get(url), credentials)
                    .send()
                    .await
                    .map_err(|err| self.classify(err))?;
                let response = self.check_status(response).await?;
                response.json::<BulkActionAggregate>().await.map_err(|err| {
                    CaseStoreError::Rejected(format!("malformed bulk action: {err}"))
                })
            })
            .await
    }

    async fn submit_bulk_event(
        &self,
        bulk_id: Uuid,
        event: BulkEvent,
        aggregate: &BulkActionAggregate,
        credentials: &Credentials,
    ) -> Result<(), CaseStoreError> {
        let url = format!(
            "{}/bulk-actions/{}/events/{}",
            self.base_url,
            bulk_id,
            event.as_str()
        );
        let url = &url;

        self.retry_policy
            .execute(move || async move {
                let response = self
                    .authorized(self.http_client.post(url), credentials)
                    .json(aggregate)
                    .send()
                    .await
                    .map_err(|err| self.classify(err))?;
                self.check_status(response).await?;
                debug!(bulk_id = %bulk_id, event = %event, "bulk event accepted");
                Ok(())
            })
            .await
    }
}
