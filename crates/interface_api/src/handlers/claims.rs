//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{AiAssessment, ClaimHistoryRecord, ClaimQuery, StatusCounts};

use crate::auth::{permission_for_transition, permissions, require_role, AgentClaims};
use crate::dto::claims::*;
use crate::dto::intake::IntakeResponse;
use crate::{error::ApiError, AppState};

/// Opens a claim and starts its intake draft
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<CreateClaimResponse>), ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    request.validate()?;

    let (claim, flow) = state.service.create_claim(request.into(), &agent.sub).await?;
    let intake = IntakeResponse::from(&flow);
    state.drafts.write().await.insert(claim.id, flow);

    Ok((
        StatusCode::CREATED,
        Json(CreateClaimResponse {
            claim: claim.into(),
            intake,
        }),
    ))
}

/// Dashboard listing
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Query(params): Query<ListClaimsParams>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    let query = ClaimQuery::try_from(params)?;

    let claims = state.service.list_claims(&query).await?;
    Ok(Json(claims.into_iter().map(ClaimResponse::from).collect()))
}

/// Per-status counts for the dashboard header
pub async fn claim_stats(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
) -> Result<Json<StatusCounts>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    Ok(Json(state.service.claim_stats().await?))
}

/// Claim with notes, history, AI assessments and the stored assessment
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimDetailResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    let detail = state.service.claim_detail(ClaimId::from_uuid(id)).await?;
    Ok(Json(detail.into()))
}

pub async fn get_actions(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionsResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    let actions = state.service.available_actions(ClaimId::from_uuid(id)).await?;
    Ok(Json(actions.into()))
}

/// Moves a claim to a new status
///
/// Approving or returning a claim needs `claim:approve`.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    require_role(&agent, permission_for_transition(request.status))?;

    let claim = state
        .service
        .transition_status(ClaimId::from_uuid(id), request.status, &agent.sub)
        .await?;
    Ok(Json(claim.into()))
}

pub async fn get_history(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClaimHistoryRecord>>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    Ok(Json(state.service.history(ClaimId::from_uuid(id)).await?))
}

/// The persisted assessment blob
pub async fn get_assessment(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentDetailsResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    let claim_id = ClaimId::from_uuid(id);

    let record = state
        .service
        .assessment_details(claim_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No assessment stored for claim {}", claim_id)))?;
    Ok(Json(record.into()))
}

pub async fn get_ai_assessments(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AiAssessment>>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    Ok(Json(state.service.ai_assessments(ClaimId::from_uuid(id)).await?))
}
