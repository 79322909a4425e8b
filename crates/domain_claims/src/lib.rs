//! Claims Intake Domain
//!
//! This crate implements vehicle damage claim intake and triage: agents open
//! a claim, attach photos, receive a damage assessment, adjust the itemized
//! estimate and move the claim through a fixed status workflow.
//!
//! # Claim Lifecycle
//!
//! ```text
//! in_progress -> under_review -> approved / rejected
//!        \          |    ^
//!         +-> requires_manual_review
//! ```
//!
//! The workflow ([`workflow`]) and estimate reconciliation ([`estimate`]) are
//! pure functions. Durable state changes go through [`ports::ClaimStorePort`].

pub mod ai_assessment;
pub mod assessment;
pub mod claim;
pub mod dashboard;
pub mod error;
pub mod estimate;
pub mod history;
pub mod intake;
pub mod note;
pub mod ports;
pub mod service;
pub mod workflow;

pub use ai_assessment::{AiAssessment, DamageSeverity};
pub use assessment::{DamageAssessor, MockAssessorConfig, MockDamageAssessor, PhotoUpload};
pub use claim::{Claim, ClaimStatus, NewClaim, Policyholder, VehicleDescriptor};
pub use dashboard::{ClaimQuery, SortDirection, SortField, StatusCounts};
pub use error::{ClaimError, GENERIC_FAILURE_MESSAGE};
pub use estimate::{
    reconcile, reconcile_assessments, BoundingBox, DamageItem, EstimateSummary, PhotoAssessment,
};
pub use history::{ClaimHistoryRecord, HistoryAction};
pub use intake::{AssessmentSubmission, IntakeFlow, IntakeMode, IntakeStage};
pub use note::{ClaimNote, NoteType};
pub use ports::{AssessmentRecord, ClaimDetail, ClaimStorePort, ClaimStorePortExt};
pub use service::{ClaimActions, ClaimService};
pub use workflow::{can_edit, can_transition, StatusAction, StatusChange};
