//! Credentials management infrastructure.
//!
//! The engine submits every store event under a system identity plus a
//! service-level token. This provider reads both from the environment; a
//! richer identity-service integration can replace it behind the same port.

use async_trait::async_trait;

use crate::domain::errors::{BulkActionError, BulkActionResult};
use crate::domain::ports::{Credentials, CredentialsProvider};

const AUTH_TOKEN_VAR: &str = "DOCKET_AUTH_TOKEN";
const SERVICE_TOKEN_VAR: &str = "DOCKET_SERVICE_TOKEN";
const USER_ID_VAR: &str = "DOCKET_USER_ID";

/// Reads submission credentials from environment variables.
#[derive(Debug, Default)]
pub struct EnvCredentialsProvider;

impl EnvCredentialsProvider {
    pub fn new() -> Self {
        Self
    }

    fn required(var: &str) -> BulkActionResult<String> {
        std::env::var(var)
            .map_err(|_| BulkActionError::Credentials(format!("{var} is not set")))
    }
}

#[async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn acquire(&self) -> BulkActionResult<Credentials> {
        Ok(Credentials {
            auth_token: Self::required(AUTH_TOKEN_VAR)?,
            service_token: Self::required(SERVICE_TOKEN_VAR)?,
            user_id: std::env::var(USER_ID_VAR).unwrap_or_else(|_| "system".to_string()),
        })
    }
}

/// Fixed credentials, for tests and local runs.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Placeholder identity for test runs.
    pub fn for_tests() -> Self {
        Self::new(Credentials {
            auth_token: "test-auth-token".to_string(),
            service_token: "test-service-token".to_string(),
            user_id: "test-user".to_string(),
        })
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn acquire(&self) -> BulkActionResult<Credentials> {
        Ok(self.credentials.clone())
    }
}
