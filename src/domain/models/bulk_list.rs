//! Slot-identified list entries for bulk action aggregates.
//!
//! The remote store models collections as lists of slotted values: each
//! element carries a slot id assigned once when the list is built. Slot ids
//! are monotonically increasing strings and are never reused, so downstream
//! consumers can address an element stably even as the list is re-ordered.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::case::CaseReference;

/// One slotted element of a store-side list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry<T> {
    /// Slot id, assigned at list-build time.
    pub id: String,
    pub value: T,
}

impl<T> ListEntry<T> {
    pub fn new(id: impl Into<String>, value: T) -> Self {
        Self { id: id.into(), value }
    }
}

/// Snapshot of one case as selected into a bulk action.
///
/// `case_parties` and `decision_date` are presentation data sourced when the
/// list is built; the engine carries them through unmodified and never
/// recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkListEntry {
    pub case_reference: CaseReference,
    /// Display string naming the parties to the case.
    pub case_parties: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<NaiveDate>,
}

impl BulkListEntry {
    pub fn new(case_reference: impl Into<CaseReference>, case_parties: impl Into<String>) -> Self {
        Self {
            case_reference: case_reference.into(),
            case_parties: case_parties.into(),
            decision_date: None,
        }
    }

    pub fn with_decision_date(mut self, date: NaiveDate) -> Self {
        self.decision_date = Some(date);
        self
    }
}

/// Build a slotted list, assigning ids `1..=n` in order.
pub fn build_slotted_list<T>(values: Vec<T>) -> Vec<ListEntry<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| ListEntry::new((idx + 1).to_string(), value))
        .collect()
}

/// Next slot id for a list: one past the highest id currently present.
///
/// Computed from the maximum, not the length, so removing an entry from the
/// middle of the list never causes an id to be handed out twice.
pub fn next_slot_id<T>(entries: &[ListEntry<T>]) -> String {
    let max = entries
        .iter()
        .filter_map(|entry| entry.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

/// Append a value to a slotted list, assigning it a fresh slot id.
pub fn append_slotted<T>(entries: &mut Vec<ListEntry<T>>, value: T) {
    let id = next_slot_id(entries);
    entries.push(ListEntry::new(id, value));
}
