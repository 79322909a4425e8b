//! Claims domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Message shown to an agent when the store fails
///
/// Store failures carry backend detail that is logged but never shown.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("No free claim number after {0} attempts")]
    ClaimNumberUnavailable(usize),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Claim cannot be edited while {0}")]
    EditNotAllowed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid cost adjustment: {0}")]
    InvalidAdjustment(String),

    #[error("Photo {0} not found in assessment")]
    PhotoNotFound(usize),

    #[error("Damage '{damage_id}' not found on photo {photo_index}")]
    DamageNotFound { photo_index: usize, damage_id: String },

    #[error("No image photos were provided")]
    NoPhotos,

    #[error("Assessment returned {actual} results for {expected} photos")]
    AssessmentShapeMismatch { expected: usize, actual: usize },

    #[error("Cannot {action} while intake is {stage}")]
    InvalidIntakeStep { stage: String, action: String },

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl ClaimError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }

    /// Text safe to show to the agent
    pub fn user_message(&self) -> String {
        match self {
            ClaimError::Store(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Returns true if the failure came from the store rather than the input
    pub fn is_store_failure(&self) -> bool {
        matches!(self, ClaimError::Store(_))
    }
}
