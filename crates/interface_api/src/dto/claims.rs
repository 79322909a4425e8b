//! Claims DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Currency;
use domain_claims::{
    AiAssessment, AssessmentRecord, Claim, ClaimActions, ClaimDetail, ClaimHistoryRecord,
    ClaimNote, ClaimQuery, ClaimStatus, EstimateSummary, NewClaim, PhotoAssessment, StatusAction,
};

use crate::dto::intake::IntakeResponse;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClaimRequest {
    #[validate(length(min = 1))]
    pub policy_number: String,
    #[validate(length(min = 1))]
    pub claimant_name: String,
    #[validate(email)]
    pub policyholder_email: Option<String>,
    pub policyholder_phone: Option<String>,
    pub accident_date: NaiveDate,
    #[validate(length(min = 1))]
    pub vehicle_make: String,
    #[validate(length(min = 1))]
    pub vehicle_model: String,
    pub vehicle_year: i32,
    pub license_plate: Option<String>,
    pub vehicle_vin: Option<String>,
    #[validate(length(min = 1))]
    pub incident_description: String,
    pub currency: Option<Currency>,
}

impl From<CreateClaimRequest> for NewClaim {
    fn from(req: CreateClaimRequest) -> Self {
        NewClaim {
            policy_number: req.policy_number,
            claimant_name: req.claimant_name,
            policyholder_email: req.policyholder_email,
            policyholder_phone: req.policyholder_phone,
            accident_date: req.accident_date,
            vehicle_make: req.vehicle_make,
            vehicle_model: req.vehicle_model,
            vehicle_year: req.vehicle_year,
            license_plate: req.license_plate,
            vehicle_vin: req.vehicle_vin,
            incident_description: req.incident_description,
            currency: req.currency.unwrap_or_default(),
        }
    }
}

/// Dashboard query string; values are parsed so a typo is a 422, not a silent default
#[derive(Debug, Default, Deserialize)]
pub struct ListClaimsParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl TryFrom<ListClaimsParams> for ClaimQuery {
    type Error = ApiError;

    fn try_from(params: ListClaimsParams) -> Result<Self, Self::Error> {
        let invalid = |e: core_kernel::CoreError| ApiError::Validation(e.to_string());
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Ok(ClaimQuery {
            search: present(params.search),
            status: present(params.status).map(|s| s.parse()).transpose().map_err(invalid)?,
            sort: present(params.sort)
                .map(|s| s.parse())
                .transpose()
                .map_err(invalid)?
                .unwrap_or_default(),
            direction: present(params.direction)
                .map(|s| s.parse())
                .transpose()
                .map_err(invalid)?
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ClaimStatus,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub claim_number: String,
    pub policy_number: String,
    pub policyholder_name: String,
    pub policyholder_email: Option<String>,
    pub policyholder_phone: Option<String>,
    pub accident_date: NaiveDate,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: i32,
    pub license_plate: Option<String>,
    pub vehicle_vin: Option<String>,
    pub incident_description: Option<String>,
    pub status: ClaimStatus,
    pub status_label: &'static str,
    pub currency: Currency,
    pub estimated_repair_cost: Option<Decimal>,
    pub final_approved_amount: Option<Decimal>,
    pub assigned_to: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: *claim.id.as_uuid(),
            claim_number: claim.claim_number,
            policy_number: claim.policy_number,
            policyholder_name: claim.policyholder.name,
            policyholder_email: claim.policyholder.email,
            policyholder_phone: claim.policyholder.phone,
            accident_date: claim.accident_date,
            vehicle_make: claim.vehicle.make,
            vehicle_model: claim.vehicle.model,
            vehicle_year: claim.vehicle.year,
            license_plate: claim.vehicle.license_plate,
            vehicle_vin: claim.vehicle.vin,
            incident_description: claim.incident_description,
            status: claim.status,
            status_label: claim.status.label(),
            currency: claim.currency,
            estimated_repair_cost: claim.estimated_repair_cost.map(|m| m.amount()),
            final_approved_amount: claim.final_approved_amount.map(|m| m.amount()),
            assigned_to: claim.assigned_to,
            reviewed_by: claim.reviewed_by,
            reviewed_at: claim.reviewed_at,
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateClaimResponse {
    pub claim: ClaimResponse,
    pub intake: IntakeResponse,
}

#[derive(Debug, Serialize)]
pub struct ActionsResponse {
    pub status: ClaimStatus,
    pub status_label: &'static str,
    pub can_edit: bool,
    pub actions: &'static [StatusAction],
}

impl From<ClaimActions> for ActionsResponse {
    fn from(actions: ClaimActions) -> Self {
        Self {
            status: actions.status,
            status_label: actions.status.label(),
            can_edit: actions.can_edit,
            actions: actions.actions,
        }
    }
}

/// A photo assessment with the URL the UI should render
#[derive(Debug, Serialize)]
pub struct PhotoView {
    #[serde(flatten)]
    pub assessment: PhotoAssessment,
    #[serde(rename = "displayUrl")]
    pub display_url: String,
}

impl From<PhotoAssessment> for PhotoView {
    fn from(assessment: PhotoAssessment) -> Self {
        let display_url = assessment.display_url().to_string();
        Self { assessment, display_url }
    }
}

#[derive(Debug, Serialize)]
pub struct AssessmentDetailsResponse {
    pub claim_id: Uuid,
    pub photos: Vec<PhotoView>,
    pub summary: EstimateSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AssessmentRecord> for AssessmentDetailsResponse {
    fn from(record: AssessmentRecord) -> Self {
        let summary = record.summary();
        Self {
            claim_id: *record.claim_id.as_uuid(),
            photos: record.assessments.into_iter().map(PhotoView::from).collect(),
            summary,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimDetailResponse {
    pub claim: ClaimResponse,
    pub can_edit: bool,
    pub actions: &'static [StatusAction],
    pub notes: Vec<ClaimNote>,
    pub history: Vec<ClaimHistoryRecord>,
    pub ai_assessments: Vec<AiAssessment>,
    pub assessment: Option<AssessmentDetailsResponse>,
}

impl From<ClaimDetail> for ClaimDetailResponse {
    fn from(detail: ClaimDetail) -> Self {
        let status = detail.claim.status;
        Self {
            can_edit: domain_claims::can_edit(status),
            actions: domain_claims::workflow::available_actions(status),
            claim: detail.claim.into(),
            notes: detail.notes,
            history: detail.history,
            ai_assessments: detail.ai_assessments,
            assessment: detail.assessment.map(Into::into),
        }
    }
}
