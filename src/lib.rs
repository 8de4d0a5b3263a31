//! Docket - Bulk Case Action Engine
//!
//! Docket applies one logical operation (pronounce, reschedule, reassign
//! judge, remove) uniformly across a batch of cases held by a bulk action
//! aggregate, against a remote case store that may fail per item. Per-case
//! failure is isolated so one bad case never blocks the batch; outcomes are
//! reconciled into succeeded/failed partitions and persisted atomically.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic and domain models
//! - **Service Layer** (`services`): Fan-out, reconciliation, validation,
//!   orchestration
//! - **Infrastructure Layer** (`infrastructure`): Config, credentials, and
//!   case store adapters
//! - **CLI Layer** (`cli`): Operator command-line interface
//!
//! # Example
//!
//! ```ignore
//! use docket::services::BulkActionOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Build the orchestrator against a store adapter and run an action.
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{BulkActionError, BulkActionResult};
pub use domain::models::{
    BulkActionAggregate, BulkActionState, BulkEvent, BulkListEntry, CaseData, CaseEvent,
    CaseReference, CaseState, CaseTask, Config, ListEntry,
};
pub use domain::ports::{CaseStoreError, Credentials, CredentialsProvider, RemoteCaseStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{BulkActionOrchestrator, BulkActionOutcome, BulkTrigger, ReconciliationEngine};
