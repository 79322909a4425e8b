//! Claim aggregate

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use fake::Fake;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, CoreError, Currency, Money};
use crate::error::ClaimError;

/// Claim status
///
/// `RequiresManualReview` is part of the persisted enumeration; see the
/// workflow module for the transitions that reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Created, photos and assessment not yet submitted
    InProgress,
    /// Submitted for approval
    UnderReview,
    /// Flagged for a manual look before review resumes
    RequiresManualReview,
    /// Approved
    Approved,
    /// Returned to the agent
    Rejected,
}

impl ClaimStatus {
    /// All statuses, in dashboard order
    pub const ALL: [ClaimStatus; 5] = [
        ClaimStatus::InProgress,
        ClaimStatus::UnderReview,
        ClaimStatus::RequiresManualReview,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
    ];

    /// The stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::InProgress => "in_progress",
            ClaimStatus::UnderReview => "under_review",
            ClaimStatus::RequiresManualReview => "requires_manual_review",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Human label shown to agents
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::InProgress => "In Progress",
            ClaimStatus::UnderReview => "Under Review",
            ClaimStatus::RequiresManualReview => "Requires Manual Review",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Claim Returned",
        }
    }

    /// Returns true when no agent action leads out of this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::unknown_value("claim status", s))
    }
}

/// The insured vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDescriptor {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
}

impl fmt::Display for VehicleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.year, self.make, self.model)
    }
}

/// The policyholder filing the claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policyholder {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A vehicle damage claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Human-facing claim number (CLM-YYYY-NNNN)
    pub claim_number: String,
    pub policy_number: String,
    pub policyholder: Policyholder,
    pub accident_date: NaiveDate,
    pub vehicle: VehicleDescriptor,
    pub incident_description: Option<String>,
    pub status: ClaimStatus,
    pub currency: Currency,
    /// Reconciled total, set when an assessment is submitted
    pub estimated_repair_cost: Option<Money>,
    pub final_approved_amount: Option<Money>,
    pub assigned_to: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Opens a new claim in `InProgress` from validated intake data
    pub fn open(new_claim: NewClaim) -> Result<Self, ClaimError> {
        new_claim.validate()?;
        let now = Utc::now();

        Ok(Self {
            id: ClaimId::new_v7(),
            claim_number: generate_claim_number(now.year()),
            policy_number: new_claim.policy_number.trim().to_string(),
            policyholder: Policyholder {
                name: new_claim.claimant_name.trim().to_string(),
                email: non_blank(new_claim.policyholder_email),
                phone: non_blank(new_claim.policyholder_phone),
            },
            accident_date: new_claim.accident_date,
            vehicle: VehicleDescriptor {
                make: new_claim.vehicle_make.trim().to_string(),
                model: new_claim.vehicle_model.trim().to_string(),
                year: new_claim.vehicle_year,
                license_plate: non_blank(new_claim.license_plate),
                vin: non_blank(new_claim.vehicle_vin),
            },
            incident_description: non_blank(Some(new_claim.incident_description)),
            status: ClaimStatus::InProgress,
            currency: new_claim.currency,
            estimated_repair_cost: None,
            final_approved_amount: None,
            assigned_to: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether photos may be re-uploaded and the assessment redone
    pub fn can_edit(&self) -> bool {
        crate::workflow::can_edit(self.status)
    }
}

/// Intake data for a new claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClaim {
    pub policy_number: String,
    pub claimant_name: String,
    pub policyholder_email: Option<String>,
    pub policyholder_phone: Option<String>,
    pub accident_date: NaiveDate,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: i32,
    pub license_plate: Option<String>,
    pub vehicle_vin: Option<String>,
    pub incident_description: String,
    #[serde(default)]
    pub currency: Currency,
}

/// Earliest model year accepted on a claim
pub const EARLIEST_VEHICLE_YEAR: i32 = 1886;

impl NewClaim {
    /// Checks required fields before anything reaches the store
    pub fn validate(&self) -> Result<(), ClaimError> {
        let required = [
            ("policy_number", &self.policy_number),
            ("claimant_name", &self.claimant_name),
            ("vehicle_make", &self.vehicle_make),
            ("vehicle_model", &self.vehicle_model),
            ("incident_description", &self.incident_description),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ClaimError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let latest_year = Utc::now().year() + 1;
        if !(EARLIEST_VEHICLE_YEAR..=latest_year).contains(&self.vehicle_year) {
            return Err(ClaimError::validation(format!(
                "vehicle_year {} is outside {}..={}",
                self.vehicle_year, EARLIEST_VEHICLE_YEAR, latest_year
            )));
        }

        if self.accident_date > Utc::now().date_naive() {
            return Err(ClaimError::validation("accident_date is in the future"));
        }

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Generates a claim number of the form `CLM-<year>-<1000..=9999>`
pub fn generate_claim_number(year: i32) -> String {
    let suffix: u16 = (1000..10000).fake();
    format!("CLM-{}-{}", year, suffix)
}
