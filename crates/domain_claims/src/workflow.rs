//! Claim status workflow
//!
//! Pure functions over [`ClaimStatus`]: which transitions an agent may
//! trigger, how each is labelled, and whether a claim may be edited.
//!
//! ```text
//! in_progress ──► under_review ──► approved
//!      │            │   ▲    └───► rejected
//!      ▼            ▼   │
//!   requires_manual_review
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, HistoryId};
use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::history::{ClaimHistoryRecord, HistoryAction};

/// An action an agent can take from the current status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusAction {
    pub target: ClaimStatus,
    pub label: &'static str,
}

const IN_PROGRESS_ACTIONS: &[StatusAction] = &[
    StatusAction { target: ClaimStatus::UnderReview, label: "Start Review" },
    StatusAction { target: ClaimStatus::RequiresManualReview, label: "Flag for Manual Review" },
];

const UNDER_REVIEW_ACTIONS: &[StatusAction] = &[
    StatusAction { target: ClaimStatus::Approved, label: "Approve Claim" },
    StatusAction { target: ClaimStatus::Rejected, label: "Return Claim" },
    StatusAction { target: ClaimStatus::RequiresManualReview, label: "Needs Manual Review" },
];

const MANUAL_REVIEW_ACTIONS: &[StatusAction] = &[
    StatusAction { target: ClaimStatus::UnderReview, label: "Resume Review" },
];

/// Actions available from `from`, in the order they are offered
pub fn available_actions(from: ClaimStatus) -> &'static [StatusAction] {
    match from {
        ClaimStatus::InProgress => IN_PROGRESS_ACTIONS,
        ClaimStatus::UnderReview => UNDER_REVIEW_ACTIONS,
        ClaimStatus::RequiresManualReview => MANUAL_REVIEW_ACTIONS,
        ClaimStatus::Approved | ClaimStatus::Rejected => &[],
    }
}

/// Statuses reachable from `from` by an agent action
pub fn allowed_transitions(from: ClaimStatus) -> Vec<ClaimStatus> {
    available_actions(from).iter().map(|a| a.target).collect()
}

/// Checks a transition against the table
pub fn can_transition(from: ClaimStatus, to: ClaimStatus) -> bool {
    available_actions(from).iter().any(|a| a.target == to)
}

/// Photos may be re-uploaded and the assessment redone only from these statuses
pub fn can_edit(status: ClaimStatus) -> bool {
    matches!(status, ClaimStatus::InProgress | ClaimStatus::Rejected)
}

/// A validated status change, ready to be written with its history record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub claim_id: ClaimId,
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    pub actor: String,
    pub changed_at: DateTime<Utc>,
    /// Set when the claim leaves `UnderReview`
    pub stamps_review: bool,
    pub history: ClaimHistoryRecord,
}

impl StatusChange {
    /// Applies the change to a claim in memory
    ///
    /// Adapters call this only after the write has succeeded.
    pub fn apply_to(&self, claim: &mut Claim) {
        claim.status = self.to;
        claim.updated_at = self.changed_at;
        if self.stamps_review {
            claim.reviewed_by = Some(self.actor.clone());
            claim.reviewed_at = Some(self.changed_at);
        }
    }
}

/// Validates a transition for `claim` and builds the change to persist
///
/// Nothing is mutated; an illegal target is rejected before any store call.
pub fn plan_transition(
    claim: &Claim,
    to: ClaimStatus,
    actor: &str,
    at: DateTime<Utc>,
) -> Result<StatusChange, ClaimError> {
    if !can_transition(claim.status, to) {
        return Err(ClaimError::InvalidStatusTransition {
            from: claim.status.to_string(),
            to: to.to_string(),
        });
    }
    let actor = actor.trim();
    if actor.is_empty() {
        return Err(ClaimError::validation("status changes require an actor"));
    }

    Ok(StatusChange {
        claim_id: claim.id,
        from: claim.status,
        to,
        actor: actor.to_string(),
        changed_at: at,
        stamps_review: claim.status == ClaimStatus::UnderReview,
        history: ClaimHistoryRecord {
            id: HistoryId::new_v7(),
            claim_id: claim.id,
            changed_by: actor.to_string(),
            action: HistoryAction::StatusChanged,
            field_changed: Some("status".to_string()),
            old_value: Some(claim.status.to_string()),
            new_value: Some(to.to_string()),
            created_at: at,
        },
    })
}
