//! Port for acquiring submission credentials.

use async_trait::async_trait;

use crate::domain::errors::BulkActionResult;

/// Identity under which store submissions are made.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token for the acting user or system identity.
    pub auth_token: String,
    /// Service-level authorization token.
    pub service_token: String,
    /// Store-side id of the acting identity.
    pub user_id: String,
}

/// Supplies a system or end-user identity plus a service token.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn acquire(&self) -> BulkActionResult<Credentials>;
}
