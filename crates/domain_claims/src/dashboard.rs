//! Dashboard listing: search, status filter, sorting and counts

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use core_kernel::CoreError;
use crate::claim::{Claim, ClaimStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    ClaimNumber,
    PolicyholderName,
    AccidentDate,
    Status,
    EstimatedRepairCost,
    Vehicle,
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "claim_number" => Ok(SortField::ClaimNumber),
            "policyholder_name" => Ok(SortField::PolicyholderName),
            "accident_date" => Ok(SortField::AccidentDate),
            "status" => Ok(SortField::Status),
            "estimated_repair_cost" => Ok(SortField::EstimatedRepairCost),
            "vehicle" | "vehicle_make" => Ok(SortField::Vehicle),
            other => Err(CoreError::unknown_value("sort field", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(CoreError::unknown_value("sort direction", other)),
        }
    }
}

/// Dashboard filter. The default lists everything, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimQuery {
    pub search: Option<String>,
    pub status: Option<ClaimStatus>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ClaimQuery {
    /// Case-insensitive match over the searchable text fields
    pub fn matches(&self, claim: &Claim) -> bool {
        if let Some(status) = self.status {
            if claim.status != status {
                return false;
            }
        }

        let needle = match self.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return true,
        };
        [
            claim.claim_number.as_str(),
            claim.policyholder.name.as_str(),
            claim.policy_number.as_str(),
            claim.vehicle.make.as_str(),
            claim.vehicle.model.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn compare_by(field: SortField, a: &Claim, b: &Claim) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::ClaimNumber => a.claim_number.cmp(&b.claim_number),
        SortField::PolicyholderName => a
            .policyholder
            .name
            .to_lowercase()
            .cmp(&b.policyholder.name.to_lowercase()),
        SortField::AccidentDate => a.accident_date.cmp(&b.accident_date),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::EstimatedRepairCost => {
            let cost = |c: &Claim| c.estimated_repair_cost.map(|m| m.amount());
            cost(a).cmp(&cost(b))
        }
        SortField::Vehicle => a
            .vehicle
            .make
            .to_lowercase()
            .cmp(&b.vehicle.make.to_lowercase()),
    }
}

fn is_missing(field: SortField, claim: &Claim) -> bool {
    field == SortField::EstimatedRepairCost && claim.estimated_repair_cost.is_none()
}

/// Applies the query; claims without a value for the sort field go last
/// in either direction
pub fn filter_and_sort(claims: Vec<Claim>, query: &ClaimQuery) -> Vec<Claim> {
    let mut matching: Vec<Claim> = claims.into_iter().filter(|c| query.matches(c)).collect();

    matching.sort_by(|a, b| {
        match (is_missing(query.sort, a), is_missing(query.sort, b)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = compare_by(query.sort, a, b);
                match query.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        }
    });
    matching
}

/// Per-status totals for the dashboard header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub by_status: BTreeMap<ClaimStatus, usize>,
}

impl StatusCounts {
    pub fn from_claims<'a>(claims: impl IntoIterator<Item = &'a Claim>) -> Self {
        let mut by_status: BTreeMap<ClaimStatus, usize> =
            ClaimStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut total = 0;
        for claim in claims {
            *by_status.entry(claim.status).or_insert(0) += 1;
            total += 1;
        }
        Self { total, by_status }
    }

    pub fn count(&self, status: ClaimStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}
