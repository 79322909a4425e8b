//! Itemized repair estimates
//!
//! Each uploaded photo yields a [`PhotoAssessment`] listing the damage found
//! in it. An agent may override the cost of any single item; the claim total
//! is always recomputed from the items and never stored separately while the
//! intake is in progress.
//!
//! Field names serialize in camelCase because the assessment blob is stored
//! verbatim in `claim_assessment_details`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, MoneyError};
use crate::error::ClaimError;

/// Shown in place of a photo that cannot be rendered after reload
pub const PLACEHOLDER_PHOTO_URL: &str = "/static/photo-unavailable.svg";

/// Detection region drawn over a photo, in percent of width/height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

/// One line of the estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageItem {
    pub id: String,
    pub location: String,
    pub damage: String,
    pub estimated_cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment_reason: Option<String>,
}

impl DamageItem {
    /// The agent's override if present, otherwise the original figure
    pub fn effective_cost(&self) -> Decimal {
        self.adjusted_cost.unwrap_or(self.estimated_cost)
    }

    pub fn is_adjusted(&self) -> bool {
        self.adjusted_cost.is_some()
    }
}

/// Findings for one uploaded photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAssessment {
    pub photo_index: usize,
    pub photo_url: String,
    pub bounding_boxes: Vec<BoundingBox>,
    pub damages: Vec<DamageItem>,
    #[serde(default)]
    pub agent_notes: String,
}

impl PhotoAssessment {
    /// URL safe to render
    ///
    /// `blob:` URLs only live in the uploading browser session, so they and
    /// empty URLs degrade to the placeholder.
    pub fn display_url(&self) -> &str {
        if self.photo_url.is_empty() || self.photo_url.starts_with("blob:") {
            PLACEHOLDER_PHOTO_URL
        } else {
            &self.photo_url
        }
    }

    pub fn subtotal(&self) -> Decimal {
        reconcile(&self.damages)
    }
}

/// Sums the effective cost of every item
pub fn reconcile(items: &[DamageItem]) -> Decimal {
    items.iter().map(DamageItem::effective_cost).sum()
}

/// Sums the effective cost across all photos
pub fn reconcile_assessments(assessments: &[PhotoAssessment]) -> Decimal {
    assessments.iter().map(PhotoAssessment::subtotal).sum()
}

/// Totals shown on the review step and the claim detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateSummary {
    /// Sum of the original figures
    pub total_estimate: Decimal,
    /// Sum of the effective figures
    pub total_adjusted: Decimal,
    pub damage_count: usize,
    pub adjusted_count: usize,
}

impl EstimateSummary {
    pub fn from_assessments(assessments: &[PhotoAssessment]) -> Self {
        let items = || assessments.iter().flat_map(|a| a.damages.iter());

        Self {
            total_estimate: items().map(|d| d.estimated_cost).sum(),
            total_adjusted: reconcile_assessments(assessments),
            damage_count: items().count(),
            adjusted_count: items().filter(|d| d.is_adjusted()).count(),
        }
    }

    /// The reconciled total as money, rejecting a negative sum
    pub fn total_money(&self, currency: Currency) -> Result<Money, MoneyError> {
        Money::non_negative(self.total_adjusted, currency)
    }

    /// Difference between the adjusted and original totals
    pub fn variance(&self) -> Decimal {
        self.total_adjusted - self.total_estimate
    }
}

/// Parses a cost typed by an agent
///
/// Blank or non-numeric input becomes zero; a negative figure is rejected.
pub fn parse_cost_input(input: &str) -> Result<Decimal, ClaimError> {
    let trimmed = input.trim().trim_start_matches('$').replace(',', "");
    let value = trimmed.parse::<Decimal>().unwrap_or(Decimal::ZERO);
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ClaimError::InvalidAdjustment(format!(
            "cost {} must not be negative",
            value
        )));
    }
    Ok(value.round_dp(2))
}

/// Overrides the cost of a single damage item
///
/// Only the matching item changes; every other item is left untouched.
pub fn adjust_damage(
    assessments: &mut [PhotoAssessment],
    photo_index: usize,
    damage_id: &str,
    cost: Decimal,
    reason: &str,
) -> Result<(), ClaimError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(ClaimError::InvalidAdjustment(format!(
            "cost {} must not be negative",
            cost
        )));
    }
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ClaimError::InvalidAdjustment(
            "an adjustment reason is required".to_string(),
        ));
    }

    let photo = assessments
        .iter_mut()
        .find(|a| a.photo_index == photo_index)
        .ok_or(ClaimError::PhotoNotFound(photo_index))?;
    let item = photo
        .damages
        .iter_mut()
        .find(|d| d.id == damage_id)
        .ok_or_else(|| ClaimError::DamageNotFound {
            photo_index,
            damage_id: damage_id.to_string(),
        })?;

    item.adjusted_cost = Some(cost);
    item.adjustment_reason = Some(reason.to_string());
    Ok(())
}
