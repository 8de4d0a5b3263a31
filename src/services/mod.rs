pub mod bulk_trigger;
pub mod case_tasks;
pub mod case_trigger;
pub mod orchestrator;
pub mod reconciliation;
pub mod validation;

pub use bulk_trigger::BulkTrigger;
pub use case_trigger::{CaseTrigger, TriggerResult};
pub use orchestrator::{BulkActionOrchestrator, BulkActionOutcome};
pub use reconciliation::{partition, Partition, ReconciliationEngine};
