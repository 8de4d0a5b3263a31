pub mod aggregate;
pub mod bulk_list;
pub mod case;
pub mod config;
pub mod task;

pub use aggregate::{BulkActionAggregate, BulkActionState, BulkEvent};
pub use bulk_list::{append_slotted, build_slotted_list, next_slot_id, BulkListEntry, ListEntry};
pub use case::{CaseData, CaseEvent, CaseReference, CaseState};
pub use config::{Config, LoggingConfig, RetryConfig, StoreConfig, TriggerConfig};
pub use task::CaseTask;
