//! End-to-end bulk action flows against the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use docket::domain::models::{
    build_slotted_list, BulkActionAggregate, BulkActionState, BulkEvent, BulkListEntry, CaseData,
    CaseEvent, CaseReference, CaseState, TriggerConfig,
};
use docket::infrastructure::credentials::StaticCredentialsProvider;
use docket::infrastructure::store::MockCaseStore;
use docket::services::orchestrator::BulkActionOrchestrator;
use docket::services::validation;
use docket::{BulkActionError, RemoteCaseStore};

fn listed_aggregate(refs: &[&str]) -> BulkActionAggregate {
    let mut aggregate = BulkActionAggregate::new(Uuid::new_v4());
    aggregate.state = BulkActionState::Listed;
    aggregate.hearing_date = Some(Utc::now() + Duration::days(7));
    aggregate.court = Some("Central Family Court".to_string());
    aggregate.pronouncement_judge = Some("District Judge Reed".to_string());
    aggregate.case_list = build_slotted_list(
        refs.iter()
            .map(|r| BulkListEntry::new(*r, format!("Parties {r}")))
            .collect(),
    );
    aggregate
}

fn orchestrator(
    store: &Arc<MockCaseStore>,
) -> BulkActionOrchestrator<MockCaseStore, StaticCredentialsProvider> {
    BulkActionOrchestrator::new(
        store.clone(),
        Arc::new(StaticCredentialsProvider::for_tests()),
        TriggerConfig::default(),
    )
}

fn refs(entries: &[docket::BulkListEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.case_reference.as_str()).collect()
}

#[tokio::test]
async fn full_success_pronounces_the_batch() {
    let store = Arc::new(MockCaseStore::new());
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1", "2", "3"]);

    let outcome = orchestrator.pronounce(&mut aggregate).await.unwrap();

    assert!(outcome.errored.is_empty());
    assert_eq!(refs(&outcome.processed), vec!["1", "2", "3"]);
    assert_eq!(aggregate.state, BulkActionState::Pronounced);

    // Every case was pronounced with the judge and a decision date.
    let events = store.submitted_case_events().await;
    assert_eq!(events.len(), 3);
    for event in &events {
        assert_eq!(event.event, CaseEvent::Pronounce);
        assert_eq!(event.data.state, CaseState::Pronounced);
        assert_eq!(event.data.pronouncement_judge.as_deref(), Some("District Judge Reed"));
        assert!(event.data.decision_date.is_some());
    }

    // One write-back carrying the full partition.
    let written = store.last_written_aggregate().await.unwrap();
    assert_eq!(written.processed_case_details.len(), 3);
    assert!(written.errored_case_details.is_empty());
}

#[tokio::test]
async fn partial_failure_keeps_batch_listed_and_retry_targets_only_the_errored_case() {
    let store = Arc::new(MockCaseStore::new());
    store.fail_case("2").await;
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1", "2", "3"]);

    let outcome = orchestrator.pronounce(&mut aggregate).await.unwrap();

    assert_eq!(refs(&outcome.processed), vec!["1", "3"]);
    assert_eq!(refs(&outcome.errored), vec!["2"]);
    assert_eq!(aggregate.state, BulkActionState::Listed);
    assert_eq!(refs(&aggregate.errored_list()).len(), 1);

    // Operator-driven retry: only the errored subset is attempted.
    store.heal_case("2").await;
    let before_retry = store.submitted_case_events().await.len();
    let retry = orchestrator.retry_pronounce(&mut aggregate).await.unwrap();

    assert_eq!(refs(&retry.processed), vec!["2"]);
    assert!(retry.errored.is_empty());
    assert_eq!(aggregate.state, BulkActionState::Pronounced);

    let events = store.submitted_case_events().await;
    assert_eq!(events.len() - before_retry, 1);
    assert_eq!(events.last().unwrap().case_reference.as_str(), "2");

    // The retry write-back replaced both lists wholesale.
    let written = store.last_written_aggregate().await.unwrap();
    assert!(written.errored_case_details.is_empty());
    assert_eq!(written.processed_case_details.len(), 1);
}

#[tokio::test]
async fn validation_failure_blocks_before_any_remote_call() {
    let store = Arc::new(MockCaseStore::new());
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1", "2"]);
    aggregate.pronouncement_judge = None;

    let err = orchestrator.pronounce(&mut aggregate).await.unwrap_err();

    assert!(matches!(err, BulkActionError::ValidationFailed(_)));
    assert!(store.submitted_case_events().await.is_empty());
    assert!(store.submitted_bulk_events().await.is_empty());
}

#[tokio::test]
async fn write_back_failure_is_fatal_after_fan_out() {
    let store = Arc::new(MockCaseStore::new());
    store.fail_bulk_writes().await;
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1"]);

    let err = orchestrator.pronounce(&mut aggregate).await.unwrap_err();

    assert!(matches!(err, BulkActionError::AggregateWriteFailed { .. }));
    // The fan-out itself happened; only persistence failed.
    assert_eq!(store.submitted_case_events().await.len(), 1);
}

#[tokio::test]
async fn reschedule_moves_every_case_to_the_new_slot() {
    let store = Arc::new(MockCaseStore::new());
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1", "2"]);
    let new_hearing = Utc::now() + Duration::days(30);

    let outcome = orchestrator
        .reschedule_hearing(&mut aggregate, new_hearing, "Birmingham Civil Justice Centre".into())
        .await
        .unwrap();

    assert!(outcome.errored.is_empty());
    assert_eq!(aggregate.hearing_date, Some(new_hearing));
    assert_eq!(aggregate.court.as_deref(), Some("Birmingham Civil Justice Centre"));

    for event in store.submitted_case_events().await {
        assert_eq!(event.event, CaseEvent::RescheduleHearing);
        assert_eq!(event.data.hearing_date, Some(new_hearing));
        assert!(event.data.pronouncement_judge.is_none());
    }

    let written = store.last_written_aggregate().await.unwrap();
    assert_eq!(
        store.submitted_bulk_events().await.last().unwrap().event,
        BulkEvent::BulkHearingRescheduled
    );
    assert_eq!(written.hearing_date, Some(new_hearing));
}

#[tokio::test]
async fn rescheduling_into_the_past_is_rejected() {
    let store = Arc::new(MockCaseStore::new());
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1"]);

    let err = orchestrator
        .reschedule_hearing(&mut aggregate, Utc::now() - Duration::days(1), "Court".into())
        .await
        .unwrap_err();

    assert!(matches!(err, BulkActionError::ValidationFailed(_)));
    assert!(store.submitted_case_events().await.is_empty());
}

#[tokio::test]
async fn reassign_judge_updates_batch_and_cases() {
    let store = Arc::new(MockCaseStore::new());
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1", "2"]);

    let outcome = orchestrator
        .reassign_judge(&mut aggregate, "District Judge Okafor".to_string())
        .await
        .unwrap();

    assert!(outcome.errored.is_empty());
    assert_eq!(aggregate.pronouncement_judge.as_deref(), Some("District Judge Okafor"));
    for event in store.submitted_case_events().await {
        assert_eq!(event.event, CaseEvent::ReassignJudge);
        assert_eq!(event.data.pronouncement_judge.as_deref(), Some("District Judge Okafor"));
    }
}

#[tokio::test]
async fn remove_cases_shrinks_the_working_list() {
    let store = Arc::new(MockCaseStore::new());
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1", "2", "3"]);

    let outcome = orchestrator
        .remove_cases(&mut aggregate, &[CaseReference::new("2")])
        .await
        .unwrap();

    assert_eq!(refs(&outcome.processed), vec!["2"]);
    let remaining: Vec<_> = aggregate
        .case_list
        .iter()
        .map(|e| e.value.case_reference.as_str())
        .collect();
    assert_eq!(remaining, vec!["1", "3"]);
    assert_eq!(aggregate.state, BulkActionState::Listed);

    // The removed case was unlinked.
    let events = store.submitted_case_events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, CaseEvent::RemoveBulkLink);
    assert_eq!(events[0].data.state, CaseState::Unlisted);
}

#[tokio::test]
async fn failed_unlink_keeps_its_case_in_the_batch() {
    let store = Arc::new(MockCaseStore::new());
    store.fail_case("2").await;
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1", "2"]);

    let outcome = orchestrator
        .remove_cases(&mut aggregate, &[CaseReference::new("2")])
        .await
        .unwrap();

    assert_eq!(refs(&outcome.errored), vec!["2"]);
    let remaining: Vec<_> = aggregate
        .case_list
        .iter()
        .map(|e| e.value.case_reference.as_str())
        .collect();
    assert_eq!(remaining, vec!["1", "2"]);
}

#[tokio::test]
async fn removing_an_unknown_case_is_rejected() {
    let store = Arc::new(MockCaseStore::new());
    let orchestrator = orchestrator(&store);
    let mut aggregate = listed_aggregate(&["1"]);

    let err = orchestrator
        .remove_cases(&mut aggregate, &[CaseReference::new("9")])
        .await
        .unwrap_err();

    assert!(matches!(err, BulkActionError::ValidationFailed(_)));
}

#[tokio::test]
async fn case_claimed_by_another_batch_fails_the_link_check() {
    let store = Arc::new(MockCaseStore::new());
    let aggregate_a = listed_aggregate(&["5"]);
    let aggregate_b = listed_aggregate(&["5"]);

    // Case 5 is already linked to batch B.
    store
        .put_case(
            "5",
            CaseData {
                state: CaseState::Listed,
                bulk_case_link: Some(aggregate_b.id),
                ..CaseData::default()
            },
        )
        .await;

    let credentials = docket::Credentials {
        auth_token: "t".into(),
        service_token: "s".into(),
        user_id: "u".into(),
    };
    let case = store
        .fetch_case(&CaseReference::new("5"), &credentials)
        .await
        .unwrap();

    let errors = validation::validate_link_to_bulk_case(
        &CaseReference::new("5"),
        &case,
        CaseState::Listed,
        aggregate_a.id,
    );

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(&aggregate_b.id.to_string()));
}
