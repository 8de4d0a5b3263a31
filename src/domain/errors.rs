//! Domain errors for the bulk case action engine.

use thiserror::Error;
use uuid::Uuid;

/// Format a list of validation messages as a single readable string.
fn format_messages(messages: &[String]) -> String {
    messages.join("; ")
}

/// Domain-level errors that can occur while running a bulk action.
#[derive(Debug, Error)]
pub enum BulkActionError {
    #[error("Bulk action not found: {0}")]
    BulkActionNotFound(Uuid),

    #[error("Validation failed: {}", format_messages(.0))]
    ValidationFailed(Vec<String>),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition { from: String, to: String, reason: String },

    #[error("Aggregate write-back failed for bulk action {bulk_id} under event {event}: {reason}")]
    AggregateWriteFailed { bulk_id: Uuid, event: String, reason: String },

    #[error("Case store error: {0}")]
    CaseStore(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type BulkActionResult<T> = Result<T, BulkActionError>;

impl From<serde_json::Error> for BulkActionError {
    fn from(err: serde_json::Error) -> Self {
        BulkActionError::Serialization(err.to_string())
    }
}
