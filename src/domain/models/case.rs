//! Case-level domain model.
//!
//! A case is an individual record held in the remote case store. The engine
//! only ever addresses it through its stable reference and mutates it by
//! submitting events carrying transformed [`CaseData`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Opaque stable identifier for one case in the remote store.
///
/// This is the sole comparison key used anywhere in the engine: list
/// reconciliation, removal checks, and duplicate detection all compare by
/// reference value, never by entry identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseReference(String);

impl CaseReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseReference {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

/// Status of an individual case in its own workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    /// Awaiting selection into a bulk action.
    AwaitingListing,
    /// Listed for hearing under a bulk action.
    Listed,
    /// Decision pronounced at the hearing.
    Pronounced,
    /// Removed from its bulk action and back in the general pool.
    Unlisted,
}

impl Default for CaseState {
    fn default() -> Self {
        Self::AwaitingListing
    }
}

impl CaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingListing => "awaiting_listing",
            Self::Listed => "listed",
            Self::Pronounced => "pronounced",
            Self::Unlisted => "unlisted",
        }
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-case data carried through a [`CaseTask`](crate::domain::models::CaseTask).
///
/// Only the fields the bulk workflows touch are modelled; everything else the
/// store returns is preserved verbatim in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CaseData {
    #[serde(default)]
    pub state: CaseState,

    /// Hearing slot this case is listed for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hearing_date: Option<DateTime<Utc>>,

    /// Court the hearing is listed at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,

    /// Judge expected to pronounce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouncement_judge: Option<String>,

    /// Date the decision becomes absolute, set at pronouncement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<NaiveDate>,

    /// Bulk action currently claiming this case, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_case_link: Option<Uuid>,

    /// Opaque store fields carried through unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CaseData {
    /// Whether this case is linked to the given bulk action.
    pub fn is_linked_to(&self, bulk_id: Uuid) -> bool {
        self.bulk_case_link == Some(bulk_id)
    }
}

/// Events submitted against an individual case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseEvent {
    /// Record the pronouncement outcome on the case.
    Pronounce,
    /// Move the case to a new hearing slot.
    RescheduleHearing,
    /// Change the pronouncement judge.
    ReassignJudge,
    /// Detach the case from its bulk action.
    RemoveBulkLink,
}

impl CaseEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pronounce => "pronounce",
            Self::RescheduleHearing => "reschedule-hearing",
            Self::ReassignJudge => "reassign-judge",
            Self::RemoveBulkLink => "remove-bulk-link",
        }
    }
}

impl fmt::Display for CaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
