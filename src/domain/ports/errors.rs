//! Errors surfaced by the case store port.

use thiserror::Error;

/// Failure submitting an event to the remote case store.
///
/// The engine never inspects these beyond logging: a per-case failure is
/// recorded and the fan-out continues, while an aggregate write-back failure
/// is escalated as fatal. Transience classification exists for the adapter's
/// own retry loop.
#[derive(Debug, Clone, Error)]
pub enum CaseStoreError {
    #[error("Case not found: {0}")]
    NotFound(String),

    #[error("Store rejected the event: {0}")]
    Rejected(String),

    #[error("Conflict submitting event: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),
}

impl CaseStoreError {
    /// Whether the adapter's retry loop may re-attempt the submission.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Timeout(_) | Self::Network(_)
        )
    }
}
