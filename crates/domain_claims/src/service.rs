//! Claims application service
//!
//! Orchestrates the pure workflow and estimate logic against the store and
//! the damage assessor. Every store failure is logged here before it is
//! returned, and in-memory state (the intake flow) only advances after the
//! store has accepted the write.

use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use core_kernel::{ClaimId, PortError};

use crate::ai_assessment::AiAssessment;
use crate::assessment::{DamageAssessor, PhotoUpload};
use crate::claim::{generate_claim_number, Claim, ClaimStatus, NewClaim};
use crate::dashboard::{ClaimQuery, StatusCounts};
use crate::error::ClaimError;
use crate::estimate::PhotoAssessment;
use crate::history::{ClaimHistoryRecord, HistoryAction};
use crate::intake::{IntakeFlow, IntakeMode};
use crate::note::{ClaimNote, NoteType};
use crate::ports::{AssessmentRecord, ClaimDetail, ClaimStorePort, ClaimStorePortExt};
use crate::workflow::{self, StatusAction};

/// Claim numbers drawn before giving up on collisions
pub const CLAIM_NUMBER_ATTEMPTS: usize = 5;

/// Actions offered for a claim in its current status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimActions {
    pub status: ClaimStatus,
    pub actions: &'static [StatusAction],
    pub can_edit: bool,
}

pub struct ClaimService {
    store: Arc<dyn ClaimStorePort>,
    assessor: Arc<dyn DamageAssessor>,
}

impl ClaimService {
    pub fn new(store: Arc<dyn ClaimStorePort>, assessor: Arc<dyn DamageAssessor>) -> Self {
        Self { store, assessor }
    }

    pub fn store(&self) -> &Arc<dyn ClaimStorePort> {
        &self.store
    }

    /// Opens a claim and returns it with a fresh intake flow
    ///
    /// A claim number already in use is redrawn up to
    /// [`CLAIM_NUMBER_ATTEMPTS`] times.
    #[instrument(skip(self, new_claim), fields(actor = %actor))]
    pub async fn create_claim(
        &self,
        new_claim: NewClaim,
        actor: &str,
    ) -> Result<(Claim, IntakeFlow), ClaimError> {
        let mut claim = Claim::open(new_claim)?;
        let mut attempt = 1;
        let stored = loop {
            match self.store.create_claim(&claim).await {
                Ok(stored) => break stored,
                Err(e) if e.is_conflict() && attempt < CLAIM_NUMBER_ATTEMPTS => {
                    warn!(claim_number = %claim.claim_number, attempt, "Claim number taken, drawing another");
                    claim.claim_number = generate_claim_number(claim.created_at.year());
                    attempt += 1;
                }
                Err(e) if e.is_conflict() => {
                    error!(claim_id = %claim.id, attempts = attempt, "No free claim number");
                    return Err(ClaimError::ClaimNumberUnavailable(attempt));
                }
                Err(e) => return Err(store_failure("create_claim", claim.id, e)),
            }
        };
        info!(claim_id = %stored.id, claim_number = %stored.claim_number, "Claim created");

        let flow = IntakeFlow::start(&stored, IntakeMode::NewClaim)?;
        Ok((stored, flow))
    }

    pub async fn list_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, ClaimError> {
        self.store.list_claims(query).await.map_err(|e| {
            error!(error = %e, "Failed to list claims");
            ClaimError::Store(e)
        })
    }

    pub async fn claim_stats(&self) -> Result<StatusCounts, ClaimError> {
        let claims = self.list_claims(&ClaimQuery::default()).await?;
        Ok(StatusCounts::from_claims(&claims))
    }

    pub async fn get_claim(&self, id: ClaimId) -> Result<Claim, ClaimError> {
        self.store
            .get_claim(id)
            .await
            .map_err(|e| store_failure("get_claim", id, e))
    }

    /// Claim with notes, history and assessments
    pub async fn claim_detail(&self, id: ClaimId) -> Result<ClaimDetail, ClaimError> {
        self.store
            .claim_detail(id)
            .await
            .map_err(|e| store_failure("claim_detail", id, e))
    }

    pub async fn available_actions(&self, id: ClaimId) -> Result<ClaimActions, ClaimError> {
        let claim = self.get_claim(id).await?;
        Ok(ClaimActions {
            status: claim.status,
            actions: workflow::available_actions(claim.status),
            can_edit: claim.can_edit(),
        })
    }

    /// Moves a claim to `to`, writing exactly one history record
    ///
    /// Illegal targets are rejected before the store is called.
    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn transition_status(
        &self,
        id: ClaimId,
        to: ClaimStatus,
        actor: &str,
    ) -> Result<Claim, ClaimError> {
        let claim = self.get_claim(id).await?;
        let change = workflow::plan_transition(&claim, to, actor, Utc::now())?;

        let updated = self
            .store
            .update_claim_status(&change)
            .await
            .map_err(|e| store_failure("update_claim_status", id, e))?;
        info!(claim_id = %id, from = %change.from, to = %change.to, "Claim status changed");
        Ok(updated)
    }

    /// Starts an edit intake for an existing claim
    ///
    /// Reopening a returned claim is recorded in its history.
    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn begin_edit(&self, id: ClaimId, actor: &str) -> Result<IntakeFlow, ClaimError> {
        let claim = self.get_claim(id).await?;
        let flow = IntakeFlow::start(&claim, IntakeMode::Edit)?;
        self.record_reopen(&claim, actor).await?;
        Ok(flow)
    }

    /// Starts over an edit intake that is already open
    ///
    /// Writes no history; the reopen was recorded when the intake began.
    pub async fn restart_edit(&self, id: ClaimId) -> Result<IntakeFlow, ClaimError> {
        let claim = self.get_claim(id).await?;
        IntakeFlow::start(&claim, IntakeMode::Edit)
    }

    async fn record_reopen(&self, claim: &Claim, actor: &str) -> Result<(), ClaimError> {
        let id = claim.id;
        if claim.status == ClaimStatus::Rejected {
            let mut record = ClaimHistoryRecord::event(id, HistoryAction::AssessmentReopened, actor);
            record.old_value = Some(claim.status.to_string());
            self.store
                .append_history(&record)
                .await
                .map_err(|e| store_failure("append_history", id, e))?;
            info!(claim_id = %id, "Returned claim reopened for assessment");
        }
        Ok(())
    }

    /// Runs the assessor over the uploaded photos and records the findings
    #[instrument(skip(self, flow, uploads), fields(claim_id = %flow.claim_id(), uploads = uploads.len()))]
    pub async fn generate_assessment<'a>(
        &self,
        flow: &'a mut IntakeFlow,
        uploads: Vec<PhotoUpload>,
    ) -> Result<&'a [PhotoAssessment], ClaimError> {
        let photos = flow.attach_photos(uploads)?;
        let assessments = self.assessor.assess(&photos).await.map_err(|e| {
            error!(error = %e, "Damage assessment failed");
            e
        })?;
        flow.record_assessments(assessments)?;
        info!(
            photos = photos.len(),
            model_version = self.assessor.model_version(),
            "Assessment generated"
        );
        Ok(flow.assessments())
    }

    /// Persists the reviewed assessment and moves the claim to `under_review`
    ///
    /// The flow stays in review if the write fails.
    #[instrument(skip(self, flow), fields(claim_id = %flow.claim_id(), actor = %actor))]
    pub async fn submit_review(
        &self,
        flow: &mut IntakeFlow,
        actor: &str,
    ) -> Result<Claim, ClaimError> {
        let claim = self.get_claim(flow.claim_id()).await?;
        if !claim.can_edit() {
            return Err(ClaimError::EditNotAllowed(claim.status.to_string()));
        }

        let submission = flow.submission(actor)?;
        let updated = self
            .store
            .submit_assessment(&submission)
            .await
            .map_err(|e| store_failure("submit_assessment", submission.claim_id, e))?;
        flow.complete()?;

        info!(total = %submission.estimated_repair_cost, "Assessment submitted for review");
        Ok(updated)
    }

    pub async fn add_note(
        &self,
        id: ClaimId,
        text: &str,
        note_type: Option<NoteType>,
        actor: &str,
    ) -> Result<ClaimNote, ClaimError> {
        let note = ClaimNote::new(id, text, note_type.unwrap_or_default(), actor)?;
        self.get_claim(id).await?;
        self.store
            .append_note(&note)
            .await
            .map_err(|e| store_failure("append_note", id, e))
    }

    pub async fn notes(&self, id: ClaimId) -> Result<Vec<ClaimNote>, ClaimError> {
        self.store
            .list_notes(id)
            .await
            .map_err(|e| store_failure("list_notes", id, e))
    }

    pub async fn history(&self, id: ClaimId) -> Result<Vec<ClaimHistoryRecord>, ClaimError> {
        self.store
            .list_history(id)
            .await
            .map_err(|e| store_failure("list_history", id, e))
    }

    pub async fn assessment_details(
        &self,
        id: ClaimId,
    ) -> Result<Option<AssessmentRecord>, ClaimError> {
        self.store
            .get_assessment_blob(id)
            .await
            .map_err(|e| store_failure("get_assessment_blob", id, e))
    }

    pub async fn ai_assessments(&self, id: ClaimId) -> Result<Vec<AiAssessment>, ClaimError> {
        self.store
            .list_ai_assessments(id)
            .await
            .map_err(|e| store_failure("list_ai_assessments", id, e))
    }
}

/// Logs a store failure and converts it for the caller
fn store_failure(operation: &str, claim_id: ClaimId, err: PortError) -> ClaimError {
    match err {
        PortError::NotFound { .. } => {
            warn!(%claim_id, operation, "Claim not found");
            ClaimError::ClaimNotFound(claim_id.to_string())
        }
        other => {
            error!(%claim_id, operation, error = %other, "Claim store operation failed");
            ClaimError::Store(other)
        }
    }
}
