//! Claim Store Port
//!
//! `ClaimStorePort` is the only way the claims domain changes durable state.
//! The PostgreSQL adapter lives in `infra_db`; an in-memory adapter for tests
//! is available behind the `mock` feature.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::ports::ClaimStorePort;
//! use std::sync::Arc;
//!
//! pub struct ClaimService {
//!     store: Arc<dyn ClaimStorePort>,
//! }
//! ```
//!
//! Every method either returns the affected row(s) or a [`PortError`]. No
//! method retries; callers log the failure and surface a generic message.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError};

use crate::ai_assessment::AiAssessment;
use crate::claim::Claim;
use crate::dashboard::ClaimQuery;
use crate::estimate::{EstimateSummary, PhotoAssessment};
use crate::history::ClaimHistoryRecord;
use crate::intake::AssessmentSubmission;
use crate::note::ClaimNote;
use crate::workflow::StatusChange;

/// The persisted assessment blob for a claim
///
/// One per claim; each submission replaces the previous blob in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub claim_id: ClaimId,
    pub assessments: Vec<PhotoAssessment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn summary(&self) -> EstimateSummary {
        EstimateSummary::from_assessments(&self.assessments)
    }
}

/// Storage operations for claims and their related records
#[async_trait]
pub trait ClaimStorePort: DomainPort + HealthCheckable {
    /// Inserts a new claim
    async fn create_claim(&self, claim: &Claim) -> Result<Claim, PortError>;

    /// Lists claims matching the dashboard query, in the query's order
    async fn list_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError>;

    /// Retrieves a claim, or `PortError::NotFound`
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Writes a status change and its history record together
    ///
    /// Fails with `PortError::Conflict` when the stored status is no longer
    /// `change.from`; nothing is written in that case.
    async fn update_claim_status(&self, change: &StatusChange) -> Result<Claim, PortError>;

    /// Writes the reconciled total, the `under_review` status, the assessment
    /// blob and the history record as one unit
    async fn submit_assessment(
        &self,
        submission: &AssessmentSubmission,
    ) -> Result<Claim, PortError>;

    /// Replaces the assessment blob for a claim
    async fn upsert_assessment_blob(
        &self,
        claim_id: ClaimId,
        assessments: &[PhotoAssessment],
    ) -> Result<AssessmentRecord, PortError>;

    async fn get_assessment_blob(
        &self,
        claim_id: ClaimId,
    ) -> Result<Option<AssessmentRecord>, PortError>;

    async fn append_note(&self, note: &ClaimNote) -> Result<ClaimNote, PortError>;

    /// Notes for a claim, newest first
    async fn list_notes(&self, claim_id: ClaimId) -> Result<Vec<ClaimNote>, PortError>;

    async fn append_history(
        &self,
        record: &ClaimHistoryRecord,
    ) -> Result<ClaimHistoryRecord, PortError>;

    /// History for a claim, newest first
    async fn list_history(&self, claim_id: ClaimId) -> Result<Vec<ClaimHistoryRecord>, PortError>;

    /// AI assessment records for a claim, newest first
    async fn list_ai_assessments(&self, claim_id: ClaimId) -> Result<Vec<AiAssessment>, PortError>;
}

/// Everything shown on the claim detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDetail {
    pub claim: Claim,
    pub notes: Vec<ClaimNote>,
    pub history: Vec<ClaimHistoryRecord>,
    pub ai_assessments: Vec<AiAssessment>,
    pub assessment: Option<AssessmentRecord>,
}

/// Extension trait with convenience methods
#[async_trait]
pub trait ClaimStorePortExt: ClaimStorePort {
    /// Loads a claim with its notes, history and assessments
    async fn claim_detail(&self, id: ClaimId) -> Result<ClaimDetail, PortError> {
        let claim = self.get_claim(id).await?;
        let notes = self.list_notes(id).await?;
        let history = self.list_history(id).await?;
        let ai_assessments = self.list_ai_assessments(id).await?;
        let assessment = self.get_assessment_blob(id).await?;

        Ok(ClaimDetail {
            claim,
            notes,
            history,
            ai_assessments,
            assessment,
        })
    }
}

impl<T: ClaimStorePort + ?Sized> ClaimStorePortExt for T {}

/// In-memory implementation of `ClaimStorePort` for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};
    use crate::claim::ClaimStatus;
    use crate::dashboard::filter_and_sort;

    #[derive(Debug, Default)]
    struct State {
        claims: HashMap<ClaimId, Claim>,
        notes: Vec<ClaimNote>,
        history: Vec<ClaimHistoryRecord>,
        blobs: HashMap<ClaimId, AssessmentRecord>,
        ai_assessments: Vec<AiAssessment>,
    }

    /// Keeps every resource behind one lock so multi-record writes are atomic
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimStore {
        state: Arc<RwLock<State>>,
        fail_writes: Arc<AtomicBool>,
        fail_reads: Arc<AtomicBool>,
    }

    impl InMemoryClaimStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims
        pub async fn with_claims(claims: Vec<Claim>) -> Self {
            let store = Self::new();
            {
                let mut state = store.state.write().await;
                for claim in claims {
                    state.claims.insert(claim.id, claim);
                }
            }
            store
        }

        /// Seeds AI assessment records, which the domain never writes
        pub async fn insert_ai_assessment(&self, assessment: AiAssessment) {
            self.state.write().await.ai_assessments.push(assessment);
        }

        /// Makes every subsequent write fail with a connection error
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Makes every subsequent read fail with a connection error
        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Total history records across all claims
        pub async fn history_len(&self) -> usize {
            self.state.read().await.history.len()
        }

        fn check_write(&self) -> Result<(), PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::connection("injected write failure"));
            }
            Ok(())
        }

        fn check_read(&self) -> Result<(), PortError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(PortError::connection("injected read failure"));
            }
            Ok(())
        }
    }

    fn newest_first<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
    where
        F: Fn(&T) -> DateTime<Utc>,
    {
        items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
        items
    }

    impl DomainPort for InMemoryClaimStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimStore {
        async fn health_check(&self) -> HealthCheckResult {
            let failing = self.fail_reads.load(Ordering::SeqCst);
            HealthCheckResult {
                adapter_id: "in-memory-claim-store".to_string(),
                status: if failing { AdapterHealth::Unhealthy } else { AdapterHealth::Healthy },
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ClaimStorePort for InMemoryClaimStore {
        async fn create_claim(&self, claim: &Claim) -> Result<Claim, PortError> {
            self.check_write()?;
            let mut state = self.state.write().await;
            if state.claims.values().any(|c| c.claim_number == claim.claim_number) {
                return Err(PortError::conflict(format!(
                    "claim number {} already exists",
                    claim.claim_number
                )));
            }
            state.claims.insert(claim.id, claim.clone());
            Ok(claim.clone())
        }

        async fn list_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
            self.check_read()?;
            let claims: Vec<Claim> = self.state.read().await.claims.values().cloned().collect();
            Ok(filter_and_sort(claims, query))
        }

        async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.check_read()?;
            self.state
                .read()
                .await
                .claims
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn update_claim_status(&self, change: &StatusChange) -> Result<Claim, PortError> {
            self.check_write()?;
            let mut state = self.state.write().await;
            let claim = state
                .claims
                .get_mut(&change.claim_id)
                .ok_or_else(|| PortError::not_found("Claim", change.claim_id))?;
            if claim.status != change.from {
                return Err(PortError::conflict(format!(
                    "claim is {} but the change expects {}",
                    claim.status, change.from
                )));
            }
            change.apply_to(claim);
            let updated = claim.clone();
            state.history.push(change.history.clone());
            Ok(updated)
        }

        async fn submit_assessment(
            &self,
            submission: &AssessmentSubmission,
        ) -> Result<Claim, PortError> {
            self.check_write()?;
            let mut state = self.state.write().await;
            let claim = state
                .claims
                .get_mut(&submission.claim_id)
                .ok_or_else(|| PortError::not_found("Claim", submission.claim_id))?;
            if claim.status != submission.expected_status {
                return Err(PortError::conflict(format!(
                    "claim is {} but the submission expects {}",
                    claim.status, submission.expected_status
                )));
            }
            submission.apply_to(claim);
            debug_assert_eq!(claim.status, ClaimStatus::UnderReview);
            let updated = claim.clone();

            let created_at = state
                .blobs
                .get(&submission.claim_id)
                .map(|b| b.created_at)
                .unwrap_or(submission.submitted_at);
            state.blobs.insert(
                submission.claim_id,
                AssessmentRecord {
                    claim_id: submission.claim_id,
                    assessments: submission.assessments.clone(),
                    created_at,
                    updated_at: submission.submitted_at,
                },
            );
            state.history.push(submission.history.clone());
            Ok(updated)
        }

        async fn upsert_assessment_blob(
            &self,
            claim_id: ClaimId,
            assessments: &[PhotoAssessment],
        ) -> Result<AssessmentRecord, PortError> {
            self.check_write()?;
            let mut state = self.state.write().await;
            if !state.claims.contains_key(&claim_id) {
                return Err(PortError::not_found("Claim", claim_id));
            }
            let now = Utc::now();
            let record = state
                .blobs
                .entry(claim_id)
                .and_modify(|r| {
                    r.assessments = assessments.to_vec();
                    r.updated_at = now;
                })
                .or_insert_with(|| AssessmentRecord {
                    claim_id,
                    assessments: assessments.to_vec(),
                    created_at: now,
                    updated_at: now,
                });
            Ok(record.clone())
        }

        async fn get_assessment_blob(
            &self,
            claim_id: ClaimId,
        ) -> Result<Option<AssessmentRecord>, PortError> {
            self.check_read()?;
            Ok(self.state.read().await.blobs.get(&claim_id).cloned())
        }

        async fn append_note(&self, note: &ClaimNote) -> Result<ClaimNote, PortError> {
            self.check_write()?;
            let mut state = self.state.write().await;
            if !state.claims.contains_key(&note.claim_id) {
                return Err(PortError::not_found("Claim", note.claim_id));
            }
            state.notes.push(note.clone());
            Ok(note.clone())
        }

        async fn list_notes(&self, claim_id: ClaimId) -> Result<Vec<ClaimNote>, PortError> {
            self.check_read()?;
            let notes = self
                .state
                .read()
                .await
                .notes
                .iter()
                .filter(|n| n.claim_id == claim_id)
                .cloned()
                .collect();
            Ok(newest_first(notes, |n: &ClaimNote| n.created_at))
        }

        async fn append_history(
            &self,
            record: &ClaimHistoryRecord,
        ) -> Result<ClaimHistoryRecord, PortError> {
            self.check_write()?;
            let mut state = self.state.write().await;
            if !state.claims.contains_key(&record.claim_id) {
                return Err(PortError::not_found("Claim", record.claim_id));
            }
            state.history.push(record.clone());
            Ok(record.clone())
        }

        async fn list_history(
            &self,
            claim_id: ClaimId,
        ) -> Result<Vec<ClaimHistoryRecord>, PortError> {
            self.check_read()?;
            let history = self
                .state
                .read()
                .await
                .history
                .iter()
                .filter(|h| h.claim_id == claim_id)
                .cloned()
                .collect();
            Ok(newest_first(history, |h: &ClaimHistoryRecord| h.created_at))
        }

        async fn list_ai_assessments(
            &self,
            claim_id: ClaimId,
        ) -> Result<Vec<AiAssessment>, PortError> {
            self.check_read()?;
            let records = self
                .state
                .read()
                .await
                .ai_assessments
                .iter()
                .filter(|a| a.claim_id == claim_id)
                .cloned()
                .collect();
            Ok(newest_first(records, |a: &AiAssessment| a.assessment_timestamp))
        }
    }
}
