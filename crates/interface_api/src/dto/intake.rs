//! Intake DTOs

use base64::Engine as _;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_claims::{EstimateSummary, IntakeFlow, IntakeMode, IntakeStage, PhotoUpload};

use crate::dto::claims::{ClaimResponse, PhotoView};
use crate::error::ApiError;

/// One photo, base64 encoded
#[derive(Debug, Deserialize)]
pub struct PhotoPayload {
    pub file_name: String,
    pub content_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadPhotosRequest {
    pub photos: Vec<PhotoPayload>,
}

impl UploadPhotosRequest {
    pub fn into_uploads(self) -> Result<Vec<PhotoUpload>, ApiError> {
        self.photos
            .into_iter()
            .map(|photo| {
                let data = base64::engine::general_purpose::STANDARD
                    .decode(photo.data.trim())
                    .map_err(|_| {
                        ApiError::Validation(format!("{} is not valid base64", photo.file_name))
                    })?;
                Ok(PhotoUpload::new(photo.file_name, photo.content_type, data))
            })
            .collect()
    }
}

/// Cost typed by the agent; kept as text so `$1,200` and blanks parse the domain's way
#[derive(Debug, Deserialize)]
pub struct AdjustDamageRequest {
    pub cost: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct AgentNotesRequest {
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub claim_id: Uuid,
    pub claim_number: String,
    pub mode: IntakeMode,
    pub stage: IntakeStage,
    pub photos: Vec<PhotoView>,
    pub summary: EstimateSummary,
    pub total: Decimal,
    pub started_at: DateTime<Utc>,
}

impl From<&IntakeFlow> for IntakeResponse {
    fn from(flow: &IntakeFlow) -> Self {
        Self {
            claim_id: *flow.claim_id().as_uuid(),
            claim_number: flow.claim_number().to_string(),
            mode: flow.mode(),
            stage: flow.stage(),
            photos: flow.assessments().iter().cloned().map(PhotoView::from).collect(),
            summary: flow.summary(),
            total: flow.total(),
            started_at: flow.started_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub claim: ClaimResponse,
    pub summary: EstimateSummary,
}
