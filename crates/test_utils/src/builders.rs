//! Test Data Builders
//!
//! Builders that let a test state only the fields it cares about.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use core_kernel::{ClaimId, Currency, Money};
use domain_claims::{Claim, ClaimStatus, Policyholder, VehicleDescriptor};

use crate::fixtures::{DateFixtures, ClaimFixtures};

/// Builder for stored claims in any status
#[derive(Debug, Clone)]
pub struct TestClaimBuilder {
    claim: Claim,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    pub fn new() -> Self {
        let form = ClaimFixtures::new_claim();
        let now = Utc::now();
        Self {
            claim: Claim {
                id: ClaimId::new_v7(),
                claim_number: "CLM-2024-1001".to_string(),
                policy_number: form.policy_number,
                policyholder: Policyholder {
                    name: form.claimant_name,
                    email: form.policyholder_email,
                    phone: form.policyholder_phone,
                },
                accident_date: DateFixtures::accident_date(),
                vehicle: VehicleDescriptor {
                    make: form.vehicle_make,
                    model: form.vehicle_model,
                    year: form.vehicle_year,
                    license_plate: form.license_plate,
                    vin: form.vehicle_vin,
                },
                incident_description: Some(form.incident_description),
                status: ClaimStatus::InProgress,
                currency: Currency::USD,
                estimated_repair_cost: None,
                final_approved_amount: None,
                assigned_to: None,
                reviewed_by: None,
                reviewed_at: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.claim.status = status;
        self
    }

    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim.claim_number = number.into();
        self
    }

    pub fn with_policyholder(mut self, name: impl Into<String>) -> Self {
        self.claim.policyholder.name = name.into();
        self
    }

    pub fn with_vehicle(mut self, make: impl Into<String>, model: impl Into<String>) -> Self {
        self.claim.vehicle.make = make.into();
        self.claim.vehicle.model = model.into();
        self
    }

    pub fn with_accident_date(mut self, date: NaiveDate) -> Self {
        self.claim.accident_date = date;
        self
    }

    pub fn with_estimated_cost(mut self, amount: Decimal) -> Self {
        self.claim.estimated_repair_cost = Some(Money::new(amount, self.claim.currency));
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.claim.created_at = at;
        self.claim.updated_at = at;
        self
    }

    /// Backdates creation by whole days
    pub fn created_days_ago(self, days: i64) -> Self {
        self.created_at(Utc::now() - Duration::days(days))
    }

    pub fn build(self) -> Claim {
        self.claim
    }
}
