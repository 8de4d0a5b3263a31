//! Bulk action aggregate model.
//!
//! The aggregate is the parent record coordinating one batch of cases, e.g.
//! every case listed for pronouncement at a single hearing. It is created by
//! a scheduling action elsewhere; this engine only replaces its errored and
//! processed lists and advances its state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::bulk_list::{BulkListEntry, ListEntry};
use super::case::CaseReference;
use crate::domain::errors::{BulkActionError, BulkActionResult};

/// Status of a bulk action aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkActionState {
    /// Created but not yet listed for a hearing.
    Created,
    /// Listed for hearing; cases may be pronounced, rescheduled, or removed.
    Listed,
    /// Every case in the batch has been pronounced.
    Pronounced,
    /// Batch abandoned; cases returned to the pool.
    Dropped,
}

impl Default for BulkActionState {
    fn default() -> Self {
        Self::Created
    }
}

impl BulkActionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Listed => "listed",
            Self::Pronounced => "pronounced",
            Self::Dropped => "dropped",
        }
    }

    /// Valid transitions from this state.
    pub fn valid_transitions(&self) -> Vec<BulkActionState> {
        match self {
            Self::Created => vec![Self::Listed, Self::Dropped],
            // Partial pronouncement failure keeps the batch Listed for retry.
            Self::Listed => vec![Self::Pronounced, Self::Dropped],
            Self::Pronounced => vec![],
            Self::Dropped => vec![],
        }
    }

    pub fn can_transition_to(&self, new_state: Self) -> bool {
        self.valid_transitions().contains(&new_state)
    }
}

impl fmt::Display for BulkActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events submitted against the aggregate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulkEvent {
    /// Write-back after a pronouncement pass.
    BulkPronounced,
    /// Write-back after a hearing reschedule pass.
    BulkHearingRescheduled,
    /// Write-back after a judge reassignment pass.
    BulkJudgeReassigned,
    /// Write-back after cases are removed from the batch.
    BulkCasesRemoved,
}

impl BulkEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BulkPronounced => "bulk-pronounced",
            Self::BulkHearingRescheduled => "bulk-hearing-rescheduled",
            Self::BulkJudgeReassigned => "bulk-judge-reassigned",
            Self::BulkCasesRemoved => "bulk-cases-removed",
        }
    }
}

impl fmt::Display for BulkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parent record for one batch of cases.
///
/// Invariant, restored after every reconciliation pass: the union of
/// `errored_case_details` and `processed_case_details` equals the working
/// list used for that pass, compared by case reference, with no reference in
/// both lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkActionAggregate {
    pub id: Uuid,

    /// Full list of cases selected into the batch at build time.
    #[serde(default)]
    pub case_list: Vec<ListEntry<BulkListEntry>>,

    /// Cases whose last fan-out submission failed. Replaced wholesale on
    /// every reconciliation; the input to a retry pass.
    #[serde(default)]
    pub errored_case_details: Vec<ListEntry<BulkListEntry>>,

    /// Cases whose last fan-out submission succeeded. Replaced wholesale on
    /// every reconciliation.
    #[serde(default)]
    pub processed_case_details: Vec<ListEntry<BulkListEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hearing_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouncement_judge: Option<String>,

    #[serde(default)]
    pub state: BulkActionState,
}

impl BulkActionAggregate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            case_list: Vec::new(),
            errored_case_details: Vec::new(),
            processed_case_details: Vec::new(),
            hearing_date: None,
            court: None,
            pronouncement_judge: None,
            state: BulkActionState::default(),
        }
    }

    /// Entries of the full working list, without slot wrappers.
    pub fn working_list(&self) -> Vec<BulkListEntry> {
        self.case_list.iter().map(|e| e.value.clone()).collect()
    }

    /// Entries that failed the previous pass; the working list for a retry.
    pub fn errored_list(&self) -> Vec<BulkListEntry> {
        self.errored_case_details.iter().map(|e| e.value.clone()).collect()
    }

    /// Case references of the full working list.
    pub fn case_references(&self) -> Vec<CaseReference> {
        self.case_list.iter().map(|e| e.value.case_reference.clone()).collect()
    }

    /// Advance the aggregate state, rejecting transitions the state machine
    /// does not allow.
    pub fn transition_to(&mut self, new_state: BulkActionState) -> BulkActionResult<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(BulkActionError::InvalidStateTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
                reason: "not a valid bulk action transition".to_string(),
            });
        }
        self.state = new_state;
        Ok(())
    }
}
