//! Stored AI assessment records
//!
//! Rows in `ai_assessments` are written by the inference side and only read
//! here for the claim detail view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AiAssessmentId, ClaimId, CoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSeverity {
    Minor,
    Moderate,
    Severe,
    TotalLoss,
}

impl DamageSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageSeverity::Minor => "minor",
            DamageSeverity::Moderate => "moderate",
            DamageSeverity::Severe => "severe",
            DamageSeverity::TotalLoss => "total_loss",
        }
    }
}

impl fmt::Display for DamageSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DamageSeverity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minor" => Ok(DamageSeverity::Minor),
            "moderate" => Ok(DamageSeverity::Moderate),
            "severe" => Ok(DamageSeverity::Severe),
            "total_loss" | "total loss" => Ok(DamageSeverity::TotalLoss),
            _ => Err(CoreError::unknown_value("damage severity", s)),
        }
    }
}

/// A model's verdict on a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAssessment {
    pub id: AiAssessmentId,
    pub claim_id: ClaimId,
    pub assessment_timestamp: DateTime<Utc>,
    pub damage_type: String,
    pub damage_severity: DamageSeverity,
    pub affected_parts: Vec<String>,
    pub estimated_cost: Decimal,
    /// 0.0 to 1.0
    pub confidence_score: Decimal,
    pub ai_model_version: String,
    pub raw_ai_response: serde_json::Value,
}

impl AiAssessment {
    /// Confidence as a whole percentage for display
    pub fn confidence_percent(&self) -> Decimal {
        (self.confidence_score * Decimal::ONE_HUNDRED).round()
    }
}
