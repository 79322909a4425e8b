//! Notes handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::ClaimId;
use domain_claims::ClaimNote;

use crate::auth::{permissions, require_role, AgentClaims};
use crate::dto::notes::CreateNoteRequest;
use crate::{error::ApiError, AppState};

/// Notes for a claim, newest first
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClaimNote>>, ApiError> {
    require_role(&agent, permissions::CLAIM_READ)?;
    Ok(Json(state.service.notes(ClaimId::from_uuid(id)).await?))
}

pub async fn add_note(
    State(state): State<AppState>,
    Extension(agent): Extension<AgentClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<ClaimNote>), ApiError> {
    require_role(&agent, permissions::CLAIM_WRITE)?;

    let note = state
        .service
        .add_note(ClaimId::from_uuid(id), &request.note_text, request.note_type, &agent.sub)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}
