//! HTTP API Layer
//!
//! REST API for claim intake and triage using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers per resource (claims, notes, intake)
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses; store failures surface
//!   only a generic message
//!
//! Intake drafts are held in memory in [`AppState::drafts`] until submitted.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(store, assessor, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::ClaimId;
use domain_claims::{ClaimService, ClaimStorePort, DamageAssessor, IntakeFlow};

use crate::config::ApiConfig;
use crate::handlers::{claims, health, intake, notes};
use crate::middleware::{audit_middleware, auth_middleware};

/// Open intake drafts by claim
pub type DraftStore = Arc<RwLock<HashMap<ClaimId, IntakeFlow>>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClaimService>,
    pub drafts: DraftStore,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `store` - Claim store adapter
/// * `assessor` - Damage assessor used for uploaded photos
/// * `config` - API configuration
pub fn create_router(
    store: Arc<dyn ClaimStorePort>,
    assessor: Arc<dyn DamageAssessor>,
    config: ApiConfig,
) -> Router {
    let state = AppState {
        service: Arc::new(ClaimService::new(store, assessor)),
        drafts: Arc::new(RwLock::new(HashMap::new())),
        config,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let intake_routes = Router::new()
        .route(
            "/",
            post(intake::start_edit)
                .get(intake::get_intake)
                .delete(intake::discard_intake),
        )
        .route(
            "/photos",
            post(intake::upload_photos).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route(
            "/photos/:photo_index/damages/:damage_id",
            put(intake::adjust_damage),
        )
        .route("/photos/:photo_index/notes", put(intake::set_agent_notes))
        .route("/review", post(intake::proceed_to_review))
        .route("/back", post(intake::back_to_assessment))
        .route("/submit", post(intake::submit));

    let claims_routes = Router::new()
        .route("/", post(claims::create_claim).get(claims::list_claims))
        .route("/stats", get(claims::claim_stats))
        .route("/:id", get(claims::get_claim))
        .route("/:id/actions", get(claims::get_actions))
        .route("/:id/status", put(claims::update_status))
        .route("/:id/history", get(claims::get_history))
        .route("/:id/notes", get(notes::list_notes).post(notes::add_note))
        .route("/:id/assessment", get(claims::get_assessment))
        .route("/:id/ai-assessments", get(claims::get_ai_assessments))
        .nest("/:id/intake", intake_routes);

    // Protected API routes
    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
