//! Property-Based Test Generators
//!
//! Proptest strategies for claim data that respect domain invariants:
//! costs are non-negative with two decimal places and damage ids are unique
//! within a photo.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::Currency;
use domain_claims::{ClaimStatus, DamageItem, PhotoAssessment};

use crate::fixtures::AssessmentFixtures;

/// Strategy for supported currencies
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::CAD),
        Just(Currency::AUD),
    ]
}

/// Strategy for any claim status
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![
        Just(ClaimStatus::InProgress),
        Just(ClaimStatus::UnderReview),
        Just(ClaimStatus::RequiresManualReview),
        Just(ClaimStatus::Approved),
        Just(ClaimStatus::Rejected),
    ]
}

/// Non-negative cost with cent precision, up to 100,000.00
pub fn cost_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A damage item, adjusted about half the time
pub fn damage_item_strategy(id: String) -> impl Strategy<Value = DamageItem> {
    (cost_strategy(), proptest::option::of(cost_strategy())).prop_map(move |(estimated, adjusted)| {
        match adjusted {
            Some(adjusted) => AssessmentFixtures::adjusted_damage(&id, estimated, adjusted),
            None => AssessmentFixtures::damage(&id, estimated),
        }
    })
}

/// Between 1 and `max` damage items with ids `damage-0..`
pub fn damage_items_strategy(max: usize) -> impl Strategy<Value = Vec<DamageItem>> {
    (1..=max.max(1)).prop_flat_map(|len| {
        (0..len)
            .map(|i| damage_item_strategy(format!("damage-{}", i)))
            .collect::<Vec<_>>()
    })
}

/// Between 1 and `max_photos` photo assessments, each with 1 to 4 damages
pub fn photo_assessments_strategy(max_photos: usize) -> impl Strategy<Value = Vec<PhotoAssessment>> {
    prop::collection::vec(damage_items_strategy(4), 1..=max_photos.max(1)).prop_map(|photos| {
        photos
            .into_iter()
            .enumerate()
            .map(|(index, damages)| AssessmentFixtures::photo(index, damages))
            .collect()
    })
}

/// Free-form cost text as an agent might type it
pub fn cost_input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        cost_strategy().prop_map(|c| c.to_string()),
        cost_strategy().prop_map(|c| format!("${}", c)),
        Just(String::new()),
        "[a-z]{1,8}",
    ]
}
