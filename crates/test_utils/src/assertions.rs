//! Custom Test Assertions
//!
//! Assertion helpers for claim types with more useful failure messages than
//! a bare `assert_eq!`.

use domain_claims::{
    reconcile_assessments, Claim, ClaimHistoryRecord, ClaimStatus, HistoryAction, PhotoAssessment,
};

/// Asserts the claim's stored estimate matches the reconciled assessments
pub fn assert_estimate_matches(claim: &Claim, assessments: &[PhotoAssessment]) {
    let expected = reconcile_assessments(assessments);
    let actual = claim
        .estimated_repair_cost
        .map(|m| m.amount())
        .unwrap_or_else(|| panic!("claim {} has no estimated_repair_cost", claim.claim_number));
    assert_eq!(
        actual, expected,
        "estimated_repair_cost {} does not match reconciled total {}",
        actual, expected
    );
}

/// Asserts a history record describes a status change `from -> to` by `actor`
pub fn assert_status_history(
    record: &ClaimHistoryRecord,
    from: ClaimStatus,
    to: ClaimStatus,
    actor: &str,
) {
    assert_eq!(record.action, HistoryAction::StatusChanged, "unexpected action");
    assert_eq!(record.field_changed.as_deref(), Some("status"));
    assert_eq!(
        record.old_value.as_deref(),
        Some(from.as_str()),
        "old_value should be {}",
        from
    );
    assert_eq!(
        record.new_value.as_deref(),
        Some(to.as_str()),
        "new_value should be {}",
        to
    );
    assert_eq!(record.changed_by, actor);
}

/// Asserts records are ordered newest first
pub fn assert_newest_first(records: &[ClaimHistoryRecord]) {
    for pair in records.windows(2) {
        assert!(
            pair[0].created_at >= pair[1].created_at,
            "history out of order: {} before {}",
            pair[0].created_at,
            pair[1].created_at
        );
    }
}
