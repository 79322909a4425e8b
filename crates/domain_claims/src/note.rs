//! Claim notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, CoreError, NoteId};
use crate::error::ClaimError;

/// Note category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    #[default]
    General,
    FollowUp,
    Decision,
    Internal,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::General => "general",
            NoteType::FollowUp => "follow_up",
            NoteType::Decision => "decision",
            NoteType::Internal => "internal",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(NoteType::General),
            "follow_up" => Ok(NoteType::FollowUp),
            "decision" => Ok(NoteType::Decision),
            "internal" => Ok(NoteType::Internal),
            other => Err(CoreError::unknown_value("note type", other)),
        }
    }
}

/// A note attached to a claim. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimNote {
    pub id: NoteId,
    pub claim_id: ClaimId,
    pub note_text: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub note_type: NoteType,
}

impl ClaimNote {
    /// Creates a note, rejecting blank text
    pub fn new(
        claim_id: ClaimId,
        note_text: &str,
        note_type: NoteType,
        created_by: &str,
    ) -> Result<Self, ClaimError> {
        let text = note_text.trim();
        if text.is_empty() {
            return Err(ClaimError::validation("note text must not be empty"));
        }

        Ok(Self {
            id: NoteId::new_v7(),
            claim_id,
            note_text: text.to_string(),
            created_by: created_by.to_string(),
            created_at: Utc::now(),
            note_type,
        })
    }
}
