//! Case task constructors, one per bulk workflow.
//!
//! Each task is a pure transform of [`CaseData`]; the fan-out applies it and
//! submits the result under the task's event. Display fields on the bulk
//! list entries are never touched here.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::models::{CaseEvent, CaseState, CaseTask};

/// Record a pronouncement: the pronouncing judge and the date the decision
/// becomes final.
pub fn pronounce(judge: String, decision_date: NaiveDate) -> CaseTask {
    CaseTask::new("pronounce-case", CaseEvent::Pronounce, move |mut data| {
        data.state = CaseState::Pronounced;
        data.pronouncement_judge = Some(judge.clone());
        data.decision_date = Some(decision_date);
        data
    })
}

/// Move the case to a new hearing slot. Pronouncement fields are cleared so
/// a previously attempted pronouncement cannot leak into the new listing.
pub fn reschedule_hearing(hearing_date: DateTime<Utc>, court: String) -> CaseTask {
    CaseTask::new(
        "reschedule-hearing",
        CaseEvent::RescheduleHearing,
        move |mut data| {
            data.state = CaseState::Listed;
            data.hearing_date = Some(hearing_date);
            data.court = Some(court.clone());
            data.pronouncement_judge = None;
            data.decision_date = None;
            data
        },
    )
}

/// Change the judge expected to pronounce, leaving the listing untouched.
pub fn reassign_judge(judge: String) -> CaseTask {
    CaseTask::new("reassign-judge", CaseEvent::ReassignJudge, move |mut data| {
        data.pronouncement_judge = Some(judge.clone());
        data
    })
}

/// Detach the case from its bulk action and return it to the pool.
pub fn remove_from_bulk() -> CaseTask {
    CaseTask::new("remove-bulk-link", CaseEvent::RemoveBulkLink, |mut data| {
        data.state = CaseState::Unlisted;
        data.bulk_case_link = None;
        data.hearing_date = None;
        data.court = None;
        data.pronouncement_judge = None;
        data
    })
}
