//! Pre-flight validation gate.
//!
//! Every function here is pure: no I/O, no clock reads. Violations come back
//! as human-readable messages; an empty vector means the check passed. The
//! gate runs before any remote call is made, so a failed batch never touches
//! the store.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::errors::{BulkActionError, BulkActionResult};
use crate::domain::models::{BulkActionAggregate, BulkListEntry, CaseData, CaseReference, CaseState};

/// Error iff the hearing is in the past. A hearing at exactly `now` passes.
pub fn validate_hearing_date(aggregate: &BulkActionAggregate, now: DateTime<Utc>) -> Vec<String> {
    match aggregate.hearing_date {
        Some(hearing) if hearing < now => {
            vec![format!("hearing date {hearing} is in the past")]
        }
        _ => Vec::new(),
    }
}

/// Error iff both the edited list and the previous list are empty.
pub fn validate_cases_are_scheduled(
    after: &[BulkListEntry],
    before: &[BulkListEntry],
) -> Vec<String> {
    if after.is_empty() && before.is_empty() {
        vec!["no cases are scheduled for this bulk action".to_string()]
    } else {
        Vec::new()
    }
}

/// Error iff a case present before the edit is missing afterwards.
///
/// Removal must go through the dedicated remove-cases operation; a general
/// scheduling edit may add cases but never silently drop them.
pub fn validate_cases_not_removed(
    after_refs: &[CaseReference],
    before_refs: &[CaseReference],
) -> Vec<String> {
    let after: HashSet<_> = after_refs.iter().collect();
    let removed: Vec<_> = before_refs
        .iter()
        .filter(|reference| !after.contains(reference))
        .collect();

    if removed.is_empty() {
        Vec::new()
    } else {
        removed
            .into_iter()
            .map(|reference| {
                format!("case {reference} was removed; use the remove-cases operation instead")
            })
            .collect()
    }
}

/// Error iff any case reference appears more than once.
pub fn validate_duplicates(refs: &[CaseReference]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for reference in refs {
        if !seen.insert(reference) && !duplicates.contains(&reference) {
            duplicates.push(reference);
        }
    }

    duplicates
        .into_iter()
        .map(|reference| format!("case {reference} appears more than once in the list"))
        .collect()
}

/// Check one case is safe to claim for a bulk action.
///
/// Two independent checks, evaluated in this fixed order; both may fire:
/// 1. the case is not in the expected pre-action state;
/// 2. the case is already linked to a *different* bulk action.
pub fn validate_link_to_bulk_case(
    case_reference: &CaseReference,
    case: &CaseData,
    expected_state: CaseState,
    bulk_id: Uuid,
) -> Vec<String> {
    let mut errors = Vec::new();

    if case.state != expected_state {
        errors.push(format!(
            "case {case_reference} is in state {} but {expected_state} was expected",
            case.state
        ));
    }

    if let Some(linked) = case.bulk_case_link {
        if linked != bulk_id {
            errors.push(format!(
                "case {case_reference} is already linked to bulk action {linked}, cannot claim for {bulk_id}"
            ));
        }
    }

    errors
}

/// Run every scheduling-edit check against an edited aggregate.
pub fn validate_bulk_schedule(
    after: &BulkActionAggregate,
    before: &BulkActionAggregate,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut errors = validate_hearing_date(after, now);
    errors.extend(validate_cases_are_scheduled(
        &after.working_list(),
        &before.working_list(),
    ));
    errors.extend(validate_cases_not_removed(
        &after.case_references(),
        &before.case_references(),
    ));
    errors.extend(validate_duplicates(&after.case_references()));
    errors
}

/// Turn accumulated messages into a blocking error.
pub fn ensure_valid(errors: Vec<String>) -> BulkActionResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(BulkActionError::ValidationFailed(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn aggregate_with_hearing(hearing: Option<DateTime<Utc>>) -> BulkActionAggregate {
        let mut aggregate = BulkActionAggregate::new(Uuid::new_v4());
        aggregate.hearing_date = hearing;
        aggregate
    }

    fn refs(values: &[&str]) -> Vec<CaseReference> {
        values.iter().map(|v| CaseReference::new(*v)).collect()
    }

    #[test]
    fn past_hearing_date_is_an_error() {
        let now = Utc::now();
        let aggregate = aggregate_with_hearing(Some(now - Duration::minutes(1)));
        assert_eq!(validate_hearing_date(&aggregate, now).len(), 1);
    }

    #[test]
    fn hearing_exactly_now_passes() {
        let now = Utc::now();
        let aggregate = aggregate_with_hearing(Some(now));
        assert!(validate_hearing_date(&aggregate, now).is_empty());

        let future = aggregate_with_hearing(Some(now + Duration::hours(1)));
        assert!(validate_hearing_date(&future, now).is_empty());
    }

    #[test]
    fn scheduled_check_fires_only_when_both_lists_empty() {
        assert_eq!(validate_cases_are_scheduled(&[], &[]).len(), 1);

        let populated = vec![BulkListEntry::new("1", "Smith v Smith")];
        assert!(validate_cases_are_scheduled(&populated, &[]).is_empty());
        assert!(validate_cases_are_scheduled(&[], &populated).is_empty());
    }

    #[test]
    fn removal_outside_remove_operation_is_an_error() {
        let before = refs(&["1", "2", "3"]);
        let after = refs(&["1", "3"]);

        let errors = validate_cases_not_removed(&after, &before);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("case 2"));
    }

    #[test]
    fn additions_are_allowed() {
        let before = refs(&["1"]);
        let after = refs(&["1", "2"]);
        assert!(validate_cases_not_removed(&after, &before).is_empty());
    }

    #[test]
    fn empty_before_is_a_subset_of_anything() {
        assert!(validate_cases_not_removed(&refs(&["1"]), &[]).is_empty());
        assert!(validate_cases_not_removed(&[], &[]).is_empty());
    }

    #[test]
    fn duplicates_reported_once_per_reference() {
        let errors = validate_duplicates(&refs(&["1", "2", "1", "1", "3"]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("case 1"));

        assert!(validate_duplicates(&refs(&["1", "2", "3"])).is_empty());
        assert!(validate_duplicates(&[]).is_empty());
    }

    #[test]
    fn duplicates_check_is_idempotent() {
        let input = refs(&["1", "1", "2"]);
        let first = validate_duplicates(&input);
        let second = validate_duplicates(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn link_check_orders_state_error_first() {
        let this_bulk = Uuid::new_v4();
        let other_bulk = Uuid::new_v4();
        let reference = CaseReference::new("5");
        let case = CaseData {
            state: CaseState::Pronounced,
            bulk_case_link: Some(other_bulk),
            ..CaseData::default()
        };

        let errors = validate_link_to_bulk_case(&reference, &case, CaseState::Listed, this_bulk);

        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("state pronounced"));
        assert!(errors[1].contains(&other_bulk.to_string()));
        assert!(errors[1].contains(&this_bulk.to_string()));
    }

    #[test]
    fn link_to_same_bulk_action_passes() {
        let this_bulk = Uuid::new_v4();
        let case = CaseData {
            state: CaseState::Listed,
            bulk_case_link: Some(this_bulk),
            ..CaseData::default()
        };

        let errors = validate_link_to_bulk_case(
            &CaseReference::new("5"),
            &case,
            CaseState::Listed,
            this_bulk,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn ensure_valid_blocks_on_any_message() {
        assert!(ensure_valid(Vec::new()).is_ok());
        let err = ensure_valid(vec!["boom".to_string()]).unwrap_err();
        assert!(matches!(err, BulkActionError::ValidationFailed(messages) if messages.len() == 1));
    }
}
