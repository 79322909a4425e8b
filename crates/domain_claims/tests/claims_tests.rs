//! Integration tests for domain_claims

use chrono::{Datelike, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use domain_claims::assessment::{DamageAssessor, MockDamageAssessor};
use domain_claims::claim::{generate_claim_number, Claim, ClaimStatus, NewClaim};
use domain_claims::dashboard::{filter_and_sort, ClaimQuery, SortDirection, SortField, StatusCounts};
use domain_claims::error::{ClaimError, GENERIC_FAILURE_MESSAGE};
use domain_claims::estimate::{parse_cost_input, reconcile, EstimateSummary};
use domain_claims::history::HistoryAction;
use domain_claims::intake::IntakeStage;
use domain_claims::note::NoteType;
use domain_claims::ports::mock::InMemoryClaimStore;
use domain_claims::ports::ClaimStorePort;
use domain_claims::service::{ClaimService, CLAIM_NUMBER_ATTEMPTS};
use domain_claims::workflow::{can_edit, can_transition, plan_transition};
use test_utils::{
    assert_estimate_matches, claim_status_strategy, cost_input_strategy, cost_strategy,
    currency_strategy, damage_items_strategy, photo_assessments_strategy, AiAssessmentFixtures,
    AssessmentFixtures, ClaimFixtures, DateFixtures, TestClaimBuilder, UploadFixtures,
};

fn new_claim() -> NewClaim {
    NewClaim {
        accident_date: DateFixtures::days_ago(3),
        ..ClaimFixtures::new_claim()
    }
}

fn open_claim(status: ClaimStatus) -> Claim {
    TestClaimBuilder::new().with_status(status).build()
}

fn service_with(store: InMemoryClaimStore) -> ClaimService {
    ClaimService::new(Arc::new(store), Arc::new(MockDamageAssessor::default()))
}

// ============================================================================
// Claim Tests
// ============================================================================

mod claim_tests {
    use super::*;

    #[test]
    fn test_open_claim() {
        let claim = Claim::open(new_claim()).unwrap();

        assert_eq!(claim.status, ClaimStatus::InProgress);
        assert!(claim.estimated_repair_cost.is_none());
        assert!(claim.reviewed_by.is_none());
        assert!(claim.claim_number.starts_with(&format!("CLM-{}-", Utc::now().year())));
    }

    #[test]
    fn test_open_claim_missing_fields() {
        let mut input = new_claim();
        input.claimant_name = "  ".to_string();
        input.vehicle_model = String::new();

        let err = Claim::open(input).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("claimant_name"));
        assert!(message.contains("vehicle_model"));
    }

    #[test]
    fn test_open_claim_implausible_year() {
        let mut input = new_claim();
        input.vehicle_year = 1700;
        assert!(matches!(Claim::open(input), Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_claim_number_format() {
        for _ in 0..50 {
            let number = generate_claim_number(2024);
            let suffix: u32 = number.strip_prefix("CLM-2024-").unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&suffix));
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ClaimStatus::Rejected.label(), "Claim Returned");
        assert_eq!(ClaimStatus::UnderReview.label(), "Under Review");
        assert_eq!(ClaimStatus::RequiresManualReview.as_str(), "requires_manual_review");
    }

    #[test]
    fn test_status_round_trip_from_str() {
        for status in ClaimStatus::ALL {
            assert_eq!(status.as_str().parse::<ClaimStatus>().unwrap(), status);
        }
        assert!("closed".parse::<ClaimStatus>().is_err());
    }
}

// ============================================================================
// Workflow Tests
// ============================================================================

mod workflow_tests {
    use super::*;

    const TABLE: &[(ClaimStatus, ClaimStatus)] = &[
        (ClaimStatus::InProgress, ClaimStatus::UnderReview),
        (ClaimStatus::InProgress, ClaimStatus::RequiresManualReview),
        (ClaimStatus::UnderReview, ClaimStatus::Approved),
        (ClaimStatus::UnderReview, ClaimStatus::Rejected),
        (ClaimStatus::UnderReview, ClaimStatus::RequiresManualReview),
        (ClaimStatus::RequiresManualReview, ClaimStatus::UnderReview),
    ];

    #[test]
    fn test_transition_table_is_exhaustive() {
        for from in ClaimStatus::ALL {
            for to in ClaimStatus::ALL {
                assert_eq!(
                    can_transition(from, to),
                    TABLE.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_can_edit() {
        for status in ClaimStatus::ALL {
            let expected = matches!(status, ClaimStatus::InProgress | ClaimStatus::Rejected);
            assert_eq!(can_edit(status), expected);
        }
    }

    #[test]
    fn test_plan_rejects_illegal_transition() {
        let claim = open_claim(ClaimStatus::InProgress);
        let result = plan_transition(&claim, ClaimStatus::Approved, "agent", Utc::now());
        assert!(matches!(result, Err(ClaimError::InvalidStatusTransition { .. })));
    }

    #[test]
    fn test_plan_stamps_review_only_from_under_review() {
        let claim = open_claim(ClaimStatus::UnderReview);
        let change = plan_transition(&claim, ClaimStatus::Approved, "reviewer", Utc::now()).unwrap();
        assert!(change.stamps_review);

        let claim = open_claim(ClaimStatus::InProgress);
        let change = plan_transition(&claim, ClaimStatus::UnderReview, "agent", Utc::now()).unwrap();
        assert!(!change.stamps_review);
    }
}

// ============================================================================
// Reconciler Tests
// ============================================================================

mod reconcile_tests {
    use super::*;

    #[test]
    fn test_adjusted_cost_wins() {
        let items = AssessmentFixtures::worked_example_items();
        assert_eq!(reconcile(&items), dec!(750));
    }

    #[test]
    fn test_empty_estimate_is_zero() {
        assert_eq!(reconcile(&[]), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_reconcile_order_independent(items in damage_items_strategy(12)) {
            let mut reversed = items.clone();
            reversed.reverse();
            prop_assert_eq!(reconcile(&items), reconcile(&reversed));
        }

        #[test]
        fn prop_reconcile_idempotent(items in damage_items_strategy(12)) {
            let before = items.clone();
            let first = reconcile(&items);
            prop_assert_eq!(first, reconcile(&items));
            prop_assert_eq!(before, items);
        }

        #[test]
        fn prop_reconcile_uses_effective_cost(items in damage_items_strategy(12)) {
            let expected: Decimal = items
                .iter()
                .map(|d| d.adjusted_cost.unwrap_or(d.estimated_cost))
                .sum();
            prop_assert_eq!(reconcile(&items), expected);
        }
    }
}

// ============================================================================
// Dashboard Tests
// ============================================================================

mod dashboard_tests {
    use super::*;
    use chrono::NaiveDate;

    fn claims() -> Vec<Claim> {
        vec![
            TestClaimBuilder::new()
                .with_claim_number("CLM-2024-1001")
                .with_policyholder("Alice Smith")
                .with_accident_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
                .created_days_ago(2)
                .build(),
            TestClaimBuilder::new()
                .with_claim_number("CLM-2024-1002")
                .with_status(ClaimStatus::UnderReview)
                .with_policyholder("Bob Jones")
                .with_vehicle("Honda", "Accord")
                .with_estimated_cost(dec!(1200))
                .with_accident_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
                .created_days_ago(1)
                .build(),
            TestClaimBuilder::new()
                .with_claim_number("CLM-2024-1003")
                .with_status(ClaimStatus::UnderReview)
                .with_policyholder("Carol White")
                .with_estimated_cost(dec!(300))
                .with_accident_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
                .build(),
        ]
    }

    #[test]
    fn test_default_is_newest_first() {
        let sorted = filter_and_sort(claims(), &ClaimQuery::default());
        let names: Vec<&str> = sorted.iter().map(|c| c.policyholder.name.as_str()).collect();
        assert_eq!(names, vec!["Carol White", "Bob Jones", "Alice Smith"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = ClaimQuery {
            search: Some("honda".to_string()),
            ..Default::default()
        };
        let found = filter_and_sort(claims(), &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].policyholder.name, "Bob Jones");
    }

    #[test]
    fn test_status_filter() {
        let query = ClaimQuery {
            status: Some(ClaimStatus::UnderReview),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(claims(), &query).len(), 2);
    }

    #[test]
    fn test_missing_cost_sorts_last_both_directions() {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let query = ClaimQuery {
                sort: SortField::EstimatedRepairCost,
                direction,
                ..Default::default()
            };
            let sorted = filter_and_sort(claims(), &query);
            assert!(sorted[2].estimated_repair_cost.is_none());
        }
    }

    #[test]
    fn test_sort_by_accident_date_ascending() {
        let query = ClaimQuery {
            sort: SortField::AccidentDate,
            direction: SortDirection::Asc,
            ..Default::default()
        };
        let sorted = filter_and_sort(claims(), &query);
        let names: Vec<&str> = sorted.iter().map(|c| c.policyholder.name.as_str()).collect();
        assert_eq!(names, vec!["Bob Jones", "Alice Smith", "Carol White"]);
    }

    #[test]
    fn test_status_counts() {
        let counts = StatusCounts::from_claims(&claims());
        assert_eq!(counts.total, 3);
        assert_eq!(counts.count(ClaimStatus::UnderReview), 2);
        assert_eq!(counts.count(ClaimStatus::Approved), 0);
    }
}

// ============================================================================
// Service Tests
// ============================================================================

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn test_status_change_writes_one_history_record() {
        let claim = open_claim(ClaimStatus::InProgress);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store.clone());

        let updated = service
            .transition_status(claim.id, ClaimStatus::UnderReview, "agent-1")
            .await
            .unwrap();
        assert_eq!(updated.status, ClaimStatus::UnderReview);

        let history = service.history(claim.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, HistoryAction::StatusChanged);
        assert_eq!(history[0].old_value.as_deref(), Some("in_progress"));
        assert_eq!(history[0].new_value.as_deref(), Some("under_review"));
        assert_eq!(history[0].changed_by, "agent-1");
    }

    #[tokio::test]
    async fn test_leaving_review_stamps_reviewer() {
        let claim = open_claim(ClaimStatus::UnderReview);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store);

        let approved = service
            .transition_status(claim.id, ClaimStatus::Approved, "reviewer-1")
            .await
            .unwrap();
        assert_eq!(approved.reviewed_by.as_deref(), Some("reviewer-1"));
        assert!(approved.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_illegal_transition_never_reaches_store() {
        let claim = open_claim(ClaimStatus::Approved);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store.clone());

        let result = service
            .transition_status(claim.id, ClaimStatus::UnderReview, "agent")
            .await;
        assert!(matches!(result, Err(ClaimError::InvalidStatusTransition { .. })));
        assert_eq!(store.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_failed_status_write_leaves_claim_unchanged() {
        let claim = open_claim(ClaimStatus::InProgress);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store.clone());

        store.fail_writes(true);
        let err = service
            .transition_status(claim.id, ClaimStatus::UnderReview, "agent")
            .await
            .unwrap_err();
        assert!(err.is_store_failure());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        store.fail_writes(false);
        let stored = store.get_claim(claim.id).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::InProgress);
        assert_eq!(store.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_assessment_shape_for_n_photos() {
        let service = service_with(InMemoryClaimStore::new());
        let (_, mut flow) = service.create_claim(new_claim(), "agent").await.unwrap();

        let uploads = UploadFixtures::pngs(4);
        let assessments = service.generate_assessment(&mut flow, uploads).await.unwrap();

        assert_eq!(assessments.len(), 4);
        assert!(assessments.iter().all(|a| a.damages.len() >= 2));
        assert_eq!(flow.stage(), IntakeStage::Assessing);
    }

    #[tokio::test]
    async fn test_submit_review_updates_total_and_status() {
        let store = InMemoryClaimStore::new();
        let service = service_with(store.clone());
        let (claim, mut flow) = service.create_claim(new_claim(), "agent").await.unwrap();

        service.generate_assessment(&mut flow, UploadFixtures::pngs(1)).await.unwrap();
        flow.adjust_damage(0, "damage-0", "100", "customer quote").unwrap();
        let summary = flow.proceed_to_review().unwrap();

        let updated = service.submit_review(&mut flow, "agent").await.unwrap();

        assert_eq!(updated.status, ClaimStatus::UnderReview);
        assert_eq!(
            updated.estimated_repair_cost.map(|m| m.amount()),
            Some(summary.total_adjusted)
        );
        assert_eq!(flow.stage(), IntakeStage::Submitted);

        let blob = service.assessment_details(claim.id).await.unwrap().unwrap();
        assert_eq!(blob.summary(), summary);
        let history = service.history(claim.id).await.unwrap();
        assert_eq!(history[0].action, HistoryAction::AssessmentSubmitted);
    }

    #[tokio::test]
    async fn test_failed_submission_advances_nothing() {
        let store = InMemoryClaimStore::new();
        let service = service_with(store.clone());
        let (claim, mut flow) = service.create_claim(new_claim(), "agent").await.unwrap();
        service.generate_assessment(&mut flow, UploadFixtures::pngs(1)).await.unwrap();
        flow.proceed_to_review().unwrap();

        store.fail_writes(true);
        assert!(service.submit_review(&mut flow, "agent").await.is_err());
        store.fail_writes(false);

        assert_eq!(flow.stage(), IntakeStage::Reviewing);
        let stored = store.get_claim(claim.id).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::InProgress);
        assert!(stored.estimated_repair_cost.is_none());
        assert!(store.get_assessment_blob(claim.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reopen_rejected_claim_records_history() {
        let claim = open_claim(ClaimStatus::Rejected);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store);

        let flow = service.begin_edit(claim.id, "agent").await.unwrap();
        assert_eq!(flow.stage(), IntakeStage::AwaitingPhotos);

        let history = service.history(claim.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, HistoryAction::AssessmentReopened);
    }

    #[tokio::test]
    async fn test_edit_refused_for_approved_claim() {
        let claim = open_claim(ClaimStatus::Approved);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store);

        assert!(matches!(
            service.begin_edit(claim.id, "agent").await,
            Err(ClaimError::EditNotAllowed(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_note_rejected() {
        let claim = open_claim(ClaimStatus::InProgress);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store);

        assert!(service.add_note(claim.id, "   ", None, "agent").await.is_err());

        let note = service
            .add_note(claim.id, "Called the body shop", None, "agent")
            .await
            .unwrap();
        assert_eq!(note.note_type, NoteType::General);
        assert_eq!(service.notes(claim.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let service = service_with(InMemoryClaimStore::new());
        let missing = core_kernel::ClaimId::new_v7();
        assert!(matches!(
            service.get_claim(missing).await,
            Err(ClaimError::ClaimNotFound(_))
        ));
    }
}

// ============================================================================
// Resubmission and Store Tests
// ============================================================================

mod resubmission_tests {
    use super::*;
    use core_kernel::ClaimId;

    #[tokio::test]
    async fn test_returned_claim_resubmits_to_review() {
        let claim = TestClaimBuilder::new()
            .with_status(ClaimStatus::Rejected)
            .with_estimated_cost(dec!(99))
            .build();
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store);

        let mut flow = service.begin_edit(claim.id, "agent").await.unwrap();
        service.generate_assessment(&mut flow, UploadFixtures::pngs(2)).await.unwrap();
        let summary = flow.proceed_to_review().unwrap();
        let updated = service.submit_review(&mut flow, "agent").await.unwrap();

        assert_eq!(updated.status, ClaimStatus::UnderReview);
        assert_ne!(summary.total_adjusted, dec!(99));
        let record = service.assessment_details(claim.id).await.unwrap().unwrap();
        assert_estimate_matches(&updated, &record.assessments);

        let actions: Vec<HistoryAction> = service
            .history(claim.id)
            .await
            .unwrap()
            .iter()
            .map(|h| h.action)
            .collect();
        assert!(actions.contains(&HistoryAction::AssessmentReopened));
        assert!(actions.contains(&HistoryAction::AssessmentSubmitted));
        assert_eq!(actions.len(), 2);
    }

    #[tokio::test]
    async fn test_restart_edit_writes_no_history() {
        let claim = open_claim(ClaimStatus::Rejected);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let service = service_with(store.clone());

        service.begin_edit(claim.id, "agent").await.unwrap();
        let restarted = service.restart_edit(claim.id).await.unwrap();
        service.restart_edit(claim.id).await.unwrap();

        assert_eq!(restarted.stage(), IntakeStage::AwaitingPhotos);
        assert_eq!(store.history_len().await, 1);
    }

    #[tokio::test]
    async fn test_claim_numbers_exhausted() {
        let year = Utc::now().year();
        let taken: Vec<Claim> = (1000..=9999)
            .map(|n| {
                TestClaimBuilder::new()
                    .with_claim_number(format!("CLM-{}-{}", year, n))
                    .build()
            })
            .collect();
        let store = InMemoryClaimStore::with_claims(taken).await;
        let service = service_with(store.clone());

        let err = service.create_claim(new_claim(), "agent").await.unwrap_err();

        assert!(matches!(err, ClaimError::ClaimNumberUnavailable(n) if n == CLAIM_NUMBER_ATTEMPTS));
        assert!(!err.is_store_failure());
        let stored = store.list_claims(&ClaimQuery::default()).await.unwrap();
        assert_eq!(stored.len(), 9000);
        assert_eq!(store.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_upserting_blob_replaces_in_place() {
        let claim = open_claim(ClaimStatus::InProgress);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;

        let first = vec![AssessmentFixtures::photo(0, AssessmentFixtures::worked_example_items())];
        let second = vec![
            AssessmentFixtures::photo(0, vec![AssessmentFixtures::damage("damage-0", dec!(900))]),
            AssessmentFixtures::photo(1, vec![AssessmentFixtures::damage("damage-0", dec!(100))]),
        ];
        let created = store.upsert_assessment_blob(claim.id, &first).await.unwrap();
        let replaced = store.upsert_assessment_blob(claim.id, &second).await.unwrap();

        assert_eq!(replaced.created_at, created.created_at);
        assert!(replaced.updated_at >= created.updated_at);

        let stored = store.get_assessment_blob(claim.id).await.unwrap().unwrap();
        assert_eq!(stored.assessments, second);
        assert_eq!(stored.created_at, created.created_at);
        assert_eq!(stored.summary().total_adjusted, dec!(1000));
    }

    #[tokio::test]
    async fn test_detail_lists_ai_assessments_newest_first() {
        let claim = open_claim(ClaimStatus::UnderReview);
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        store
            .insert_ai_assessment(AiAssessmentFixtures::record(claim.id, "damage-v1", 48))
            .await;
        store
            .insert_ai_assessment(AiAssessmentFixtures::record(claim.id, "damage-v2", 1))
            .await;
        store
            .insert_ai_assessment(AiAssessmentFixtures::record(ClaimId::new_v7(), "other", 0))
            .await;
        let service = service_with(store);

        let detail = service.claim_detail(claim.id).await.unwrap();
        let versions: Vec<&str> = detail
            .ai_assessments
            .iter()
            .map(|a| a.ai_model_version.as_str())
            .collect();
        assert_eq!(versions, vec!["damage-v2", "damage-v1"]);
        assert_eq!(detail.ai_assessments[0].confidence_percent(), dec!(87));

        let listed = service.ai_assessments(claim.id).await.unwrap();
        assert_eq!(listed, detail.ai_assessments);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn prop_transition_planned_only_when_allowed(
            from in claim_status_strategy(),
            to in claim_status_strategy(),
        ) {
            let planned = plan_transition(&open_claim(from), to, "agent", Utc::now());
            prop_assert_eq!(planned.is_ok(), can_transition(from, to));
        }

        #[test]
        fn prop_only_open_or_returned_claims_are_editable(status in claim_status_strategy()) {
            let expected = matches!(status, ClaimStatus::InProgress | ClaimStatus::Rejected);
            prop_assert_eq!(can_edit(status), expected);
        }

        #[test]
        fn prop_cost_input_is_never_negative(input in cost_input_strategy()) {
            let cost = parse_cost_input(&input).unwrap();
            prop_assert!(cost >= Decimal::ZERO);
        }

        #[test]
        fn prop_dollar_prefix_is_ignored(cost in cost_strategy()) {
            prop_assert_eq!(parse_cost_input(&format!("${}", cost)).unwrap(), cost);
        }

        #[test]
        fn prop_summary_agrees_with_reconciler(photos in photo_assessments_strategy(5)) {
            let summary = EstimateSummary::from_assessments(&photos);
            let items: Vec<_> = photos.iter().flat_map(|p| p.damages.clone()).collect();

            prop_assert_eq!(summary.total_adjusted, reconcile(&items));
            prop_assert_eq!(summary.damage_count, items.len());
            prop_assert!(summary.adjusted_count <= summary.damage_count);
            prop_assert_eq!(summary.variance(), summary.total_adjusted - summary.total_estimate);
        }

        #[test]
        fn prop_total_money_keeps_currency(
            photos in photo_assessments_strategy(3),
            currency in currency_strategy(),
        ) {
            let summary = EstimateSummary::from_assessments(&photos);
            let money = summary.total_money(currency).unwrap();
            prop_assert_eq!(money.currency(), currency);
            prop_assert_eq!(money.amount(), summary.total_adjusted);
        }

        #[test]
        fn prop_stub_findings_have_expected_shape(count in 1usize..6) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let assessor = MockDamageAssessor::default();
            let assessments = runtime
                .block_on(assessor.assess(&UploadFixtures::pngs(count)))
                .unwrap();

            prop_assert_eq!(assessments.len(), count);
            for (i, photo) in assessments.iter().enumerate() {
                prop_assert_eq!(photo.photo_index, i);
                prop_assert!((2..=4).contains(&photo.damages.len()));
                prop_assert_eq!(photo.bounding_boxes.len(), photo.damages.len());

                let locations: HashSet<&str> =
                    photo.damages.iter().map(|d| d.location.as_str()).collect();
                prop_assert_eq!(locations.len(), photo.damages.len());
                for damage in &photo.damages {
                    prop_assert!(damage.estimated_cost >= dec!(200));
                    prop_assert!(damage.estimated_cost < dec!(2200));
                }
            }
        }
    }
}
