//! Pre-built Test Fixtures
//!
//! Ready-to-use claim intake data. Fixed values are predictable; the
//! `random_*` helpers use `fake` for variety.

use chrono::{Days, Duration, NaiveDate, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{AiAssessmentId, ClaimId, Currency};
use domain_claims::{
    AiAssessment, BoundingBox, DamageItem, DamageSeverity, NewClaim, PhotoAssessment, PhotoUpload,
};

/// Fixed dates
pub struct DateFixtures;

impl DateFixtures {
    pub fn accident_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    pub fn days_ago(days: u64) -> NaiveDate {
        Utc::now().date_naive() - Days::new(days)
    }
}

/// Claim intake fixtures
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// A complete, valid intake form
    pub fn new_claim() -> NewClaim {
        NewClaim {
            policy_number: "POL-2024-001234".to_string(),
            claimant_name: "Jane Doe".to_string(),
            policyholder_email: Some("jane.doe@example.com".to_string()),
            policyholder_phone: Some("555-0100".to_string()),
            accident_date: DateFixtures::accident_date(),
            vehicle_make: "Toyota".to_string(),
            vehicle_model: "Camry".to_string(),
            vehicle_year: 2021,
            license_plate: Some("ABC-1234".to_string()),
            vehicle_vin: Some("4T1BF1FK5CU000000".to_string()),
            incident_description: "Rear-ended at a stop light".to_string(),
            currency: Currency::USD,
        }
    }

    /// A valid intake form with generated policyholder details
    pub fn random_new_claim() -> NewClaim {
        let year: i32 = (1995..2024).fake();
        NewClaim {
            policy_number: format!("POL-{}", (100_000..999_999).fake::<u32>()),
            claimant_name: Name().fake(),
            policyholder_email: Some(SafeEmail().fake()),
            vehicle_year: year,
            accident_date: DateFixtures::days_ago((1..365).fake::<u64>()),
            ..Self::new_claim()
        }
    }
}

/// Damage assessment fixtures
pub struct AssessmentFixtures;

impl AssessmentFixtures {
    pub fn damage(id: &str, estimated: Decimal) -> DamageItem {
        DamageItem {
            id: id.to_string(),
            location: "Front bumper".to_string(),
            damage: "Dent".to_string(),
            estimated_cost: estimated,
            adjusted_cost: None,
            adjustment_reason: None,
        }
    }

    pub fn adjusted_damage(id: &str, estimated: Decimal, adjusted: Decimal) -> DamageItem {
        DamageItem {
            adjusted_cost: Some(adjusted),
            adjustment_reason: Some("Body shop quote".to_string()),
            ..Self::damage(id, estimated)
        }
    }

    /// The worked example: 500 + (300 adjusted to 250) = 750
    pub fn worked_example_items() -> Vec<DamageItem> {
        vec![
            Self::damage("damage-0", dec!(500)),
            Self::adjusted_damage("damage-1", dec!(300), dec!(250)),
        ]
    }

    pub fn photo(index: usize, damages: Vec<DamageItem>) -> PhotoAssessment {
        PhotoAssessment {
            photo_index: index,
            photo_url: "data:image/png;base64,iVBORw0KGgo=".to_string(),
            bounding_boxes: damages
                .iter()
                .enumerate()
                .map(|(i, d)| BoundingBox {
                    id: format!("bbox-{}", i),
                    x: 20.0,
                    y: 20.0,
                    width: 15.0,
                    height: 15.0,
                    label: d.damage.clone(),
                })
                .collect(),
            damages,
            agent_notes: String::new(),
        }
    }
}

/// Upload fixtures
pub struct UploadFixtures;

impl UploadFixtures {
    pub fn png(name: &str) -> PhotoUpload {
        PhotoUpload::new(name, "image/png", vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a])
    }

    pub fn pdf(name: &str) -> PhotoUpload {
        PhotoUpload::new(name, "application/pdf", b"%PDF-1.7".to_vec())
    }

    pub fn pngs(count: usize) -> Vec<PhotoUpload> {
        (0..count).map(|i| Self::png(&format!("photo-{}.png", i))).collect()
    }

    /// A JPEG padded to `bytes`, the size of a typical phone photo
    pub fn large_jpeg(name: &str, bytes: usize) -> PhotoUpload {
        let mut data = vec![0xff, 0xd8, 0xff, 0xe0];
        data.resize(bytes.max(data.len()), 0x5a);
        PhotoUpload::new(name, "image/jpeg", data)
    }
}

/// Fixture for stored AI assessment records
pub struct AiAssessmentFixtures;

impl AiAssessmentFixtures {
    /// A record made `hours_ago` hours before now
    pub fn record(claim_id: ClaimId, model_version: &str, hours_ago: i64) -> AiAssessment {
        AiAssessment {
            id: AiAssessmentId::new_v7(),
            claim_id,
            assessment_timestamp: Utc::now() - Duration::hours(hours_ago),
            damage_type: "collision".to_string(),
            damage_severity: DamageSeverity::Moderate,
            affected_parts: vec!["Front Bumper".to_string(), "Hood".to_string()],
            estimated_cost: dec!(1850.00),
            confidence_score: dec!(0.87),
            ai_model_version: model_version.to_string(),
            raw_ai_response: serde_json::json!({ "model": model_version }),
        }
    }
}
