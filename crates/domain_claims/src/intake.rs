//! Intake flow state machine
//!
//! Replaces the modal sequence an agent walks through when filing or
//! re-assessing a claim:
//!
//! ```text
//! AwaitingPhotos ──► Assessing ◄──► Reviewing ──► Submitted
//! ```
//!
//! The flow holds every unsaved figure in memory. Nothing here touches the
//! store; the service persists [`AssessmentSubmission`] and only then calls
//! [`IntakeFlow::complete`], so a failed write leaves the flow in `Reviewing`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ClaimId, Currency, HistoryId, Money};
use crate::assessment::{filter_images, PhotoUpload};
use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::estimate::{self, EstimateSummary, PhotoAssessment};
use crate::history::{ClaimHistoryRecord, HistoryAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStage {
    AwaitingPhotos,
    Assessing,
    Reviewing,
    Submitted,
}

impl fmt::Display for IntakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntakeStage::AwaitingPhotos => "awaiting_photos",
            IntakeStage::Assessing => "assessing",
            IntakeStage::Reviewing => "reviewing",
            IntakeStage::Submitted => "submitted",
        };
        f.write_str(s)
    }
}

/// Whether the flow files a fresh claim or redoes an existing assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeMode {
    NewClaim,
    Edit,
}

/// Everything written to the store when a review is submitted
///
/// Adapters persist all of it or none of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub claim_id: ClaimId,
    /// Status the claim must still be in for the write to apply
    pub expected_status: ClaimStatus,
    pub estimated_repair_cost: Money,
    pub assessments: Vec<PhotoAssessment>,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    pub history: ClaimHistoryRecord,
}

impl AssessmentSubmission {
    /// Applies the submission to a claim in memory after a successful write
    pub fn apply_to(&self, claim: &mut Claim) {
        claim.estimated_repair_cost = Some(self.estimated_repair_cost);
        claim.status = ClaimStatus::UnderReview;
        claim.updated_at = self.submitted_at;
    }
}

/// In-memory draft of an intake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeFlow {
    claim_id: ClaimId,
    claim_number: String,
    claim_status: ClaimStatus,
    currency: Currency,
    mode: IntakeMode,
    stage: IntakeStage,
    pending_photos: usize,
    assessments: Vec<PhotoAssessment>,
    started_at: DateTime<Utc>,
}

impl IntakeFlow {
    /// Starts a flow for `claim`
    ///
    /// A new claim must still be `InProgress`; an edit requires the claim to
    /// be editable.
    pub fn start(claim: &Claim, mode: IntakeMode) -> Result<Self, ClaimError> {
        let allowed = match mode {
            IntakeMode::NewClaim => claim.status == ClaimStatus::InProgress,
            IntakeMode::Edit => claim.can_edit(),
        };
        if !allowed {
            return Err(ClaimError::EditNotAllowed(claim.status.to_string()));
        }

        Ok(Self {
            claim_id: claim.id,
            claim_number: claim.claim_number.clone(),
            claim_status: claim.status,
            currency: claim.currency,
            mode,
            stage: IntakeStage::AwaitingPhotos,
            pending_photos: 0,
            assessments: Vec::new(),
            started_at: Utc::now(),
        })
    }

    pub fn claim_id(&self) -> ClaimId {
        self.claim_id
    }

    pub fn claim_number(&self) -> &str {
        &self.claim_number
    }

    pub fn mode(&self) -> IntakeMode {
        self.mode
    }

    pub fn stage(&self) -> IntakeStage {
        self.stage
    }

    pub fn assessments(&self) -> &[PhotoAssessment] {
        &self.assessments
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn require(&self, stages: &[IntakeStage], action: &str) -> Result<(), ClaimError> {
        if stages.contains(&self.stage) {
            Ok(())
        } else {
            Err(ClaimError::InvalidIntakeStep {
                stage: self.stage.to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Accepts an upload batch and returns the images to assess
    ///
    /// Uploading again while assessing replaces the previous findings once
    /// the new ones are recorded.
    pub fn attach_photos(
        &mut self,
        uploads: Vec<PhotoUpload>,
    ) -> Result<Vec<PhotoUpload>, ClaimError> {
        self.require(&[IntakeStage::AwaitingPhotos, IntakeStage::Assessing], "attach photos")?;
        let images = filter_images(uploads)?;
        self.pending_photos = images.len();
        Ok(images)
    }

    /// Stores the assessor's findings for the attached photos
    pub fn record_assessments(
        &mut self,
        assessments: Vec<PhotoAssessment>,
    ) -> Result<(), ClaimError> {
        self.require(&[IntakeStage::AwaitingPhotos, IntakeStage::Assessing], "record assessments")?;
        if self.pending_photos == 0 || assessments.len() != self.pending_photos {
            return Err(ClaimError::AssessmentShapeMismatch {
                expected: self.pending_photos,
                actual: assessments.len(),
            });
        }
        if let Some(empty) = assessments.iter().find(|a| a.damages.is_empty()) {
            return Err(ClaimError::validation(format!(
                "assessment for photo {} has no damages",
                empty.photo_index
            )));
        }

        self.assessments = assessments;
        self.pending_photos = 0;
        self.stage = IntakeStage::Assessing;
        Ok(())
    }

    /// Overrides one damage item's cost with raw agent input
    pub fn adjust_damage(
        &mut self,
        photo_index: usize,
        damage_id: &str,
        cost_input: &str,
        reason: &str,
    ) -> Result<EstimateSummary, ClaimError> {
        self.require(&[IntakeStage::Assessing], "adjust a cost")?;
        let cost = estimate::parse_cost_input(cost_input)?;
        estimate::adjust_damage(&mut self.assessments, photo_index, damage_id, cost, reason)?;
        Ok(self.summary())
    }

    pub fn set_agent_notes(&mut self, photo_index: usize, notes: &str) -> Result<(), ClaimError> {
        self.require(&[IntakeStage::Assessing], "edit photo notes")?;
        let photo = self
            .assessments
            .iter_mut()
            .find(|a| a.photo_index == photo_index)
            .ok_or(ClaimError::PhotoNotFound(photo_index))?;
        photo.agent_notes = notes.trim().to_string();
        Ok(())
    }

    pub fn proceed_to_review(&mut self) -> Result<EstimateSummary, ClaimError> {
        self.require(&[IntakeStage::Assessing], "proceed to review")?;
        self.stage = IntakeStage::Reviewing;
        Ok(self.summary())
    }

    pub fn back_to_assessment(&mut self) -> Result<(), ClaimError> {
        self.require(&[IntakeStage::Reviewing], "go back to assessment")?;
        self.stage = IntakeStage::Assessing;
        Ok(())
    }

    pub fn summary(&self) -> EstimateSummary {
        EstimateSummary::from_assessments(&self.assessments)
    }

    /// The reconciled total for the current findings
    pub fn total(&self) -> Decimal {
        estimate::reconcile_assessments(&self.assessments)
    }

    /// Builds the write for the store without changing the flow
    pub fn submission(&self, actor: &str) -> Result<AssessmentSubmission, ClaimError> {
        self.require(&[IntakeStage::Reviewing], "submit")?;
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(ClaimError::validation("submission requires an actor"));
        }
        let total = self.summary().total_money(self.currency)?;
        let now = Utc::now();

        Ok(AssessmentSubmission {
            claim_id: self.claim_id,
            expected_status: self.claim_status,
            estimated_repair_cost: total,
            assessments: self.assessments.clone(),
            submitted_by: actor.to_string(),
            submitted_at: now,
            history: ClaimHistoryRecord {
                id: HistoryId::new_v7(),
                claim_id: self.claim_id,
                changed_by: actor.to_string(),
                action: HistoryAction::AssessmentSubmitted,
                field_changed: Some("status".to_string()),
                old_value: Some(self.claim_status.to_string()),
                new_value: Some(ClaimStatus::UnderReview.to_string()),
                created_at: now,
            },
        })
    }

    /// Marks the flow finished once the submission is stored
    pub fn complete(&mut self) -> Result<(), ClaimError> {
        self.require(&[IntakeStage::Reviewing], "complete")?;
        self.stage = IntakeStage::Submitted;
        self.claim_status = ClaimStatus::UnderReview;
        Ok(())
    }

    /// Drops every unsaved photo and adjustment
    pub fn discard(self) -> ClaimId {
        self.claim_id
    }
}
