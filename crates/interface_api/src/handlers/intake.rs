//! Intake handlers
//!
//! Drafts live in memory, keyed by claim. Each step works on a copy of the
//! draft and writes it back only on success, so a failed step leaves the
//! draft exactly as it was.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::ClaimId;
use domain_claims::IntakeFlow;

use crate::auth::{permissions, require_role, AgentClaims};
use crate::dto::intake::*;
use crate::{error::ApiError, AppState};

async fn load_draft(state: &AppState, claim_id: ClaimId) -> Result<IntakeFlow, ApiError> {
    state
        .drafts
        .read()
        .await
        .get(&claim_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("No intake in progress for claim {}", claim_id)))
}

async fn save_draft(state: &AppState, flow: IntakeFlow) -> IntakeResponse {
    let response = IntakeResponse::from(&flow);
    state.drafts.write().await.insert(flow.claim_id(), flow);
    response
}

/// Starts an edit intake for an existing claim, replacing any open draft
///
/// Only the first start is recorded as a reopen.
pub async fn start_edit(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<IntakeResponse>), ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    let claim_id = ClaimId::from_uuid(id);

    let draft_open = state.drafts.read().await.contains_key(&claim_id);
    let flow = if draft_open {
        state.service.restart_edit(claim_id).await?
    } else {
        state.service.begin_edit(claim_id, &agent.sub).await?
    };
    Ok((StatusCode::CREATED, Json(save_draft(&state, flow).await)))
}

pub async fn get_intake(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<IntakeResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    let flow = load_draft(&state, ClaimId::from_uuid(id)).await?;
    Ok(Json(IntakeResponse::from(&flow)))
}

/// Drops the draft; the stored claim is untouched
pub async fn discard_intake(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    let claim_id = ClaimId::from_uuid(id);

    let flow = state
        .drafts
        .write()
        .await
        .remove(&claim_id)
        .ok_or_else(|| ApiError::NotFound(format!("No intake in progress for claim {}", claim_id)))?;
    tracing::info!(claim_id = %flow.discard(), agent = %agent.sub, "Intake discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// Uploads photos and generates a damage assessment for them
pub async fn upload_photos(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<UploadPhotosRequest>,
) -> Result<Json<IntakeResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    let mut flow = load_draft(&state, ClaimId::from_uuid(id)).await?;

    let uploads = request.into_uploads()?;
    state.service.generate_assessment(&mut flow, uploads).await?;
    Ok(Json(save_draft(&state, flow).await))
}

pub async fn adjust_damage(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path((id, photo_index, damage_id)): Path<(Uuid, usize, String)>,
    Json(request): Json<AdjustDamageRequest>,
) -> Result<Json<IntakeResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    let mut flow = load_draft(&state, ClaimId::from_uuid(id)).await?;

    flow.adjust_damage(photo_index, &damage_id, &request.cost, &request.reason)?;
    Ok(Json(save_draft(&state, flow).await))
}

pub async fn set_agent_notes(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path((id, photo_index)): Path<(Uuid, usize)>,
    Json(request): Json<AgentNotesRequest>,
) -> Result<Json<IntakeResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    let mut flow = load_draft(&state, ClaimId::from_uuid(id)).await?;

    flow.set_agent_notes(photo_index, &request.notes)?;
    Ok(Json(save_draft(&state, flow).await))
}

pub async fn proceed_to_review(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<IntakeResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    let mut flow = load_draft(&state, ClaimId::from_uuid(id)).await?;

    flow.proceed_to_review()?;
    Ok(Json(save_draft(&state, flow).await))
}

pub async fn back_to_assessment(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<IntakeResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    let mut flow = load_draft(&state, ClaimId::from_uuid(id)).await?;

    flow.back_to_assessment()?;
    Ok(Json(save_draft(&state, flow).await))
}

/// Persists the reviewed assessment; the draft is dropped once stored
pub async fn submit(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;
    let claim_id = ClaimId::from_uuid(id);
    let mut flow = load_draft(&state, claim_id).await?;

    let claim = state.service.submit_review(&mut flow, &agent.sub).await?;
    state.drafts.write().await.remove(&claim_id);

    Ok(Json(SubmitResponse {
        claim: claim.into(),
        summary: flow.summary(),
    }))
}
