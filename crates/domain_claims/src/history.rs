//! Append-only claim audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, CoreError, HistoryId};

/// What a history record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    StatusChanged,
    AssessmentSubmitted,
    AssessmentReopened,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::StatusChanged => "status_changed",
            HistoryAction::AssessmentSubmitted => "assessment_submitted",
            HistoryAction::AssessmentReopened => "assessment_reopened",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status_changed" => Ok(HistoryAction::StatusChanged),
            "assessment_submitted" => Ok(HistoryAction::AssessmentSubmitted),
            "assessment_reopened" => Ok(HistoryAction::AssessmentReopened),
            other => Err(CoreError::unknown_value("history action", other)),
        }
    }
}

/// One immutable entry in a claim's history
///
/// Records are only ever inserted; no port operation updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimHistoryRecord {
    pub id: HistoryId,
    pub claim_id: ClaimId,
    pub changed_by: String,
    pub action: HistoryAction,
    pub field_changed: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ClaimHistoryRecord {
    /// A record for an event that is not a single field change
    pub fn event(claim_id: ClaimId, action: HistoryAction, actor: &str) -> Self {
        Self {
            id: HistoryId::new_v7(),
            claim_id,
            changed_by: actor.to_string(),
            action,
            field_changed: None,
            old_value: None,
            new_value: None,
            created_at: Utc::now(),
        }
    }
}
