//! PostgreSQL Claim Store Adapter
//!
//! Implements `ClaimStorePort` on top of [`ClaimsRepository`], translating
//! between domain types and row types and mapping `DatabaseError` into
//! `PortError`.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimStore;
//! use domain_claims::ClaimStorePort;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimStorePort> = Arc::new(PostgresClaimStore::new(pool));
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, AiAssessmentId, ClaimId, Currency, DomainPort, HealthCheckResult,
    HealthCheckable, HistoryId, Money, NoteId, PortError,
};
use domain_claims::{
    AiAssessment, AssessmentRecord, AssessmentSubmission, Claim, ClaimHistoryRecord, ClaimNote,
    ClaimQuery, ClaimStatus, ClaimStorePort, DamageSeverity, HistoryAction, NoteType,
    PhotoAssessment, Policyholder, SortDirection, SortField, StatusChange, VehicleDescriptor,
};

use crate::pool;
use crate::repositories::claims::{
    AiAssessmentRow, AssessmentDetailsRow, ClaimColumn, ClaimFilter, ClaimRow, ClaimsRepository,
    HistoryRow, NoteRow, StatusUpdate, ClaimStatus as DbClaimStatus, NoteType as DbNoteType,
};

const ADAPTER_ID: &str = "postgres-claim-store";

/// PostgreSQL-backed implementation of `ClaimStorePort`
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    /// The underlying repository, for operations outside the port
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        match pool::ping(&self.pool).await {
            Ok(latency_ms) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms: 0,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl ClaimStorePort for PostgresClaimStore {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn create_claim(&self, claim: &Claim) -> Result<Claim, PortError> {
        let row = self.repository.insert_claim(&claim_to_row(claim)).await?;
        debug!(claim_number = %row.claim_number, "Inserted claim");
        row_to_claim(row)
    }

    #[instrument(skip(self))]
    async fn list_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
        let rows = self.repository.list(&query_to_filter(query)).await?;
        debug!(count = rows.len(), "Listed claims");
        rows.into_iter().map(row_to_claim).collect()
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        row_to_claim(self.repository.get_by_id(id.into()).await?)
    }

    #[instrument(skip(self, change), fields(claim_id = %change.claim_id, from = %change.from, to = %change.to))]
    async fn update_claim_status(&self, change: &StatusChange) -> Result<Claim, PortError> {
        let update = StatusUpdate {
            status: status_to_db(change.to),
            updated_at: change.changed_at,
            reviewed_by: change.stamps_review.then(|| change.actor.clone()),
            reviewed_at: change.stamps_review.then_some(change.changed_at),
        };
        let row = self
            .repository
            .update_status(
                change.claim_id.into(),
                status_to_db(change.from),
                &update,
                &history_to_row(&change.history),
            )
            .await?;
        row_to_claim(row)
    }

    #[instrument(skip(self, submission), fields(claim_id = %submission.claim_id, total = %submission.estimated_repair_cost))]
    async fn submit_assessment(
        &self,
        submission: &AssessmentSubmission,
    ) -> Result<Claim, PortError> {
        let data = assessments_to_json(&submission.assessments)?;
        let row = self
            .repository
            .submit_assessment(
                submission.claim_id.into(),
                status_to_db(submission.expected_status),
                submission.estimated_repair_cost.amount(),
                &data,
                submission.submitted_at,
                &history_to_row(&submission.history),
            )
            .await?;
        row_to_claim(row)
    }

    #[instrument(skip(self, assessments), fields(claim_id = %claim_id, photos = assessments.len()))]
    async fn upsert_assessment_blob(
        &self,
        claim_id: ClaimId,
        assessments: &[PhotoAssessment],
    ) -> Result<AssessmentRecord, PortError> {
        let data = assessments_to_json(assessments)?;
        let row = self.repository.upsert_assessment(claim_id.into(), &data).await?;
        row_to_assessment_record(row)
    }

    #[instrument(skip(self), fields(claim_id = %claim_id))]
    async fn get_assessment_blob(
        &self,
        claim_id: ClaimId,
    ) -> Result<Option<AssessmentRecord>, PortError> {
        self.repository
            .get_assessment(claim_id.into())
            .await?
            .map(row_to_assessment_record)
            .transpose()
    }

    #[instrument(skip(self, note), fields(claim_id = %note.claim_id))]
    async fn append_note(&self, note: &ClaimNote) -> Result<ClaimNote, PortError> {
        let row = self.repository.insert_note(&note_to_row(note)).await?;
        Ok(row_to_note(row))
    }

    #[instrument(skip(self), fields(claim_id = %claim_id))]
    async fn list_notes(&self, claim_id: ClaimId) -> Result<Vec<ClaimNote>, PortError> {
        let rows = self.repository.list_notes(claim_id.into()).await?;
        Ok(rows.into_iter().map(row_to_note).collect())
    }

    #[instrument(skip(self, record), fields(claim_id = %record.claim_id, action = %record.action))]
    async fn append_history(
        &self,
        record: &ClaimHistoryRecord,
    ) -> Result<ClaimHistoryRecord, PortError> {
        let row = self.repository.insert_history(&history_to_row(record)).await?;
        row_to_history(row)
    }

    #[instrument(skip(self), fields(claim_id = %claim_id))]
    async fn list_history(&self, claim_id: ClaimId) -> Result<Vec<ClaimHistoryRecord>, PortError> {
        let rows = self.repository.list_history(claim_id.into()).await?;
        rows.into_iter().map(row_to_history).collect()
    }

    #[instrument(skip(self), fields(claim_id = %claim_id))]
    async fn list_ai_assessments(&self, claim_id: ClaimId) -> Result<Vec<AiAssessment>, PortError> {
        let rows = self.repository.list_ai_assessments(claim_id.into()).await?;
        rows.into_iter().map(row_to_ai_assessment).collect()
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn status_to_db(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::InProgress => DbClaimStatus::InProgress,
        ClaimStatus::UnderReview => DbClaimStatus::UnderReview,
        ClaimStatus::RequiresManualReview => DbClaimStatus::RequiresManualReview,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
    }
}

fn db_to_status(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::InProgress => ClaimStatus::InProgress,
        DbClaimStatus::UnderReview => ClaimStatus::UnderReview,
        DbClaimStatus::RequiresManualReview => ClaimStatus::RequiresManualReview,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
    }
}

fn note_type_to_db(note_type: NoteType) -> DbNoteType {
    match note_type {
        NoteType::General => DbNoteType::General,
        NoteType::FollowUp => DbNoteType::FollowUp,
        NoteType::Decision => DbNoteType::Decision,
        NoteType::Internal => DbNoteType::Internal,
    }
}

fn db_to_note_type(note_type: DbNoteType) -> NoteType {
    match note_type {
        DbNoteType::General => NoteType::General,
        DbNoteType::FollowUp => NoteType::FollowUp,
        DbNoteType::Decision => NoteType::Decision,
        DbNoteType::Internal => NoteType::Internal,
    }
}

fn query_to_filter(query: &ClaimQuery) -> ClaimFilter {
    let order_by = match query.sort {
        SortField::CreatedAt => ClaimColumn::CreatedAt,
        SortField::ClaimNumber => ClaimColumn::ClaimNumber,
        SortField::PolicyholderName => ClaimColumn::PolicyholderName,
        SortField::AccidentDate => ClaimColumn::AccidentDate,
        SortField::Status => ClaimColumn::Status,
        SortField::EstimatedRepairCost => ClaimColumn::EstimatedRepairCost,
        SortField::Vehicle => ClaimColumn::VehicleMake,
    };

    ClaimFilter {
        search: query.search.clone(),
        status: query.status.map(status_to_db),
        order_by,
        descending: query.direction == SortDirection::Desc,
    }
}

fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        claim_id: claim.id.into(),
        claim_number: claim.claim_number.clone(),
        policy_number: claim.policy_number.clone(),
        policyholder_name: claim.policyholder.name.clone(),
        policyholder_email: claim.policyholder.email.clone(),
        policyholder_phone: claim.policyholder.phone.clone(),
        accident_date: claim.accident_date,
        license_plate: claim.vehicle.license_plate.clone(),
        vehicle_vin: claim.vehicle.vin.clone(),
        vehicle_make: claim.vehicle.make.clone(),
        vehicle_model: claim.vehicle.model.clone(),
        vehicle_year: claim.vehicle.year,
        status: status_to_db(claim.status),
        currency: claim.currency.code().to_string(),
        estimated_repair_cost: claim.estimated_repair_cost.map(|m| m.amount()),
        final_approved_amount: claim.final_approved_amount.map(|m| m.amount()),
        incident_description: claim.incident_description.clone(),
        assigned_to: claim.assigned_to.clone(),
        reviewed_by: claim.reviewed_by.clone(),
        reviewed_at: claim.reviewed_at,
        created_at: claim.created_at,
        updated_at: claim.updated_at,
    }
}

fn row_to_claim(row: ClaimRow) -> Result<Claim, PortError> {
    let currency: Currency = row
        .currency
        .parse()
        .map_err(|e| PortError::transformation(format!("claim {}: {}", row.claim_id, e)))?;

    Ok(Claim {
        id: ClaimId::from(row.claim_id),
        claim_number: row.claim_number,
        policy_number: row.policy_number,
        policyholder: Policyholder {
            name: row.policyholder_name,
            email: row.policyholder_email,
            phone: row.policyholder_phone,
        },
        accident_date: row.accident_date,
        vehicle: VehicleDescriptor {
            make: row.vehicle_make,
            model: row.vehicle_model,
            year: row.vehicle_year,
            license_plate: row.license_plate,
            vin: row.vehicle_vin,
        },
        incident_description: row.incident_description,
        status: db_to_status(row.status),
        currency,
        estimated_repair_cost: row.estimated_repair_cost.map(|a| Money::new(a, currency)),
        final_approved_amount: row.final_approved_amount.map(|a| Money::new(a, currency)),
        assigned_to: row.assigned_to,
        reviewed_by: row.reviewed_by,
        reviewed_at: row.reviewed_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn note_to_row(note: &ClaimNote) -> NoteRow {
    NoteRow {
        note_id: note.id.into(),
        claim_id: note.claim_id.into(),
        note_text: note.note_text.clone(),
        created_by: note.created_by.clone(),
        created_at: note.created_at,
        note_type: note_type_to_db(note.note_type),
    }
}

fn row_to_note(row: NoteRow) -> ClaimNote {
    ClaimNote {
        id: NoteId::from(row.note_id),
        claim_id: ClaimId::from(row.claim_id),
        note_text: row.note_text,
        created_by: row.created_by,
        created_at: row.created_at,
        note_type: db_to_note_type(row.note_type),
    }
}

fn history_to_row(record: &ClaimHistoryRecord) -> HistoryRow {
    HistoryRow {
        history_id: record.id.into(),
        claim_id: record.claim_id.into(),
        changed_by: record.changed_by.clone(),
        action: record.action.as_str().to_string(),
        field_changed: record.field_changed.clone(),
        old_value: record.old_value.clone(),
        new_value: record.new_value.clone(),
        created_at: record.created_at,
    }
}

fn row_to_history(row: HistoryRow) -> Result<ClaimHistoryRecord, PortError> {
    let action: HistoryAction = row
        .action
        .parse()
        .map_err(|e| PortError::transformation(format!("history {}: {}", row.history_id, e)))?;

    Ok(ClaimHistoryRecord {
        id: HistoryId::from(row.history_id),
        claim_id: ClaimId::from(row.claim_id),
        changed_by: row.changed_by,
        action,
        field_changed: row.field_changed,
        old_value: row.old_value,
        new_value: row.new_value,
        created_at: row.created_at,
    })
}

fn assessments_to_json(assessments: &[PhotoAssessment]) -> Result<serde_json::Value, PortError> {
    serde_json::to_value(assessments)
        .map_err(|e| PortError::transformation(format!("assessment blob: {}", e)))
}

fn row_to_assessment_record(row: AssessmentDetailsRow) -> Result<AssessmentRecord, PortError> {
    let assessments: Vec<PhotoAssessment> = serde_json::from_value(row.assessment_data)
        .map_err(|e| PortError::transformation(format!("assessment blob for {}: {}", row.claim_id, e)))?;

    Ok(AssessmentRecord {
        claim_id: ClaimId::from(row.claim_id),
        assessments,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_ai_assessment(row: AiAssessmentRow) -> Result<AiAssessment, PortError> {
    let damage_severity: DamageSeverity = row
        .damage_severity
        .parse()
        .map_err(|e| PortError::transformation(format!("ai assessment {}: {}", row.ai_assessment_id, e)))?;

    Ok(AiAssessment {
        id: AiAssessmentId::from(row.ai_assessment_id),
        claim_id: ClaimId::from(row.claim_id),
        assessment_timestamp: row.assessment_timestamp,
        damage_type: row.damage_type,
        damage_severity,
        affected_parts: row.affected_parts,
        estimated_cost: row.estimated_cost,
        confidence_score: row.confidence_score,
        ai_model_version: row.ai_model_version,
        raw_ai_response: row.raw_ai_response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::NewClaim;
    use rust_decimal_macros::dec;

    fn sample_claim() -> Claim {
        Claim::open(NewClaim {
            policy_number: "POL-1".to_string(),
            claimant_name: "Jane Doe".to_string(),
            policyholder_email: None,
            policyholder_phone: Some("555-0100".to_string()),
            accident_date: Utc::now().date_naive(),
            vehicle_make: "Ford".to_string(),
            vehicle_model: "Focus".to_string(),
            vehicle_year: 2018,
            license_plate: None,
            vehicle_vin: Some("1FADP3F20JL000000".to_string()),
            incident_description: "Hail".to_string(),
            currency: Currency::EUR,
        })
        .unwrap()
    }

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in ClaimStatus::ALL {
            assert_eq!(db_to_status(status_to_db(status)), status);
        }
    }

    #[test]
    fn test_note_type_conversion_roundtrip() {
        for note_type in [NoteType::General, NoteType::FollowUp, NoteType::Decision, NoteType::Internal] {
            assert_eq!(db_to_note_type(note_type_to_db(note_type)), note_type);
        }
    }

    #[test]
    fn test_claim_row_roundtrip() {
        let mut claim = sample_claim();
        claim.estimated_repair_cost = Some(Money::new(dec!(1234.50), Currency::EUR));

        let back = row_to_claim(claim_to_row(&claim)).unwrap();
        assert_eq!(back, claim);
    }

    #[test]
    fn test_unknown_currency_is_transformation_error() {
        let mut row = claim_to_row(&sample_claim());
        row.currency = "XYZ".to_string();
        assert!(matches!(row_to_claim(row), Err(PortError::Transformation { .. })));
    }

    #[test]
    fn test_default_query_lists_newest_first() {
        let filter = query_to_filter(&ClaimQuery::default());
        assert_eq!(filter.order_by, ClaimColumn::CreatedAt);
        assert!(filter.descending);
    }
}
