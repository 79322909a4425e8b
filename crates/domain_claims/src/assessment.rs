//! Damage assessment
//!
//! [`DamageAssessor`] is the seam between the intake flow and whatever
//! produces damage findings. The only implementation today is
//! [`MockDamageAssessor`], which generates random but well-shaped results:
//! one assessment per photo, never an empty damage list.

use async_trait::async_trait;
use base64::Engine as _;
use fake::Fake;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClaimError;
use crate::estimate::{BoundingBox, DamageItem, PhotoAssessment};

/// An uploaded file as received from the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    /// Inline `data:` URL so the photo survives being stored in the blob
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type.trim(),
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

/// Keeps only image uploads, failing when none remain
pub fn filter_images(uploads: Vec<PhotoUpload>) -> Result<Vec<PhotoUpload>, ClaimError> {
    let total = uploads.len();
    let images: Vec<PhotoUpload> = uploads.into_iter().filter(PhotoUpload::is_image).collect();
    if images.len() < total {
        debug!(dropped = total - images.len(), "Ignored non-image uploads");
    }
    if images.is_empty() {
        return Err(ClaimError::NoPhotos);
    }
    Ok(images)
}

/// Produces damage findings for a batch of photos
///
/// Implementations must return exactly one assessment per photo, in upload
/// order, each with at least one damage item.
#[async_trait]
pub trait DamageAssessor: Send + Sync {
    async fn assess(&self, photos: &[PhotoUpload]) -> Result<Vec<PhotoAssessment>, ClaimError>;

    /// Identifier recorded alongside generated findings
    fn model_version(&self) -> &str;
}

const DAMAGE_TYPES: &[&str] = &[
    "Panel damage",
    "Scratch",
    "Dent",
    "Bumper damage",
    "Paint damage",
    "Cracked light",
    "Mirror damage",
    "Windshield crack",
    "Tire damage",
    "Rim damage",
];

const VEHICLE_LOCATIONS: &[&str] = &[
    "Front bumper",
    "Rear bumper",
    "Driver side door",
    "Passenger side door",
    "Driver side wheel well",
    "Passenger side wheel well",
    "Hood",
    "Roof",
    "Trunk",
    "Front fender",
    "Rear fender",
    "Headlight",
    "Taillight",
    "Side mirror",
];

/// Shape of the generated findings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockAssessorConfig {
    pub min_damages: usize,
    pub max_damages: usize,
    /// Inclusive lower bound, whole currency units
    pub min_cost: u32,
    /// Exclusive upper bound
    pub max_cost: u32,
}

impl Default for MockAssessorConfig {
    fn default() -> Self {
        Self {
            min_damages: 2,
            max_damages: 4,
            min_cost: 200,
            max_cost: 2200,
        }
    }
}

impl MockAssessorConfig {
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.min_damages == 0 || self.min_damages > self.max_damages {
            return Err(ClaimError::validation(format!(
                "damage range {}..={} is invalid",
                self.min_damages, self.max_damages
            )));
        }
        if self.max_damages > VEHICLE_LOCATIONS.len() {
            return Err(ClaimError::validation(format!(
                "at most {} damages fit on distinct locations",
                VEHICLE_LOCATIONS.len()
            )));
        }
        if self.min_cost >= self.max_cost {
            return Err(ClaimError::validation(format!(
                "cost range {}..{} is empty",
                self.min_cost, self.max_cost
            )));
        }
        Ok(())
    }
}

/// Random stand-in for a vision model
#[derive(Debug, Clone)]
pub struct MockDamageAssessor {
    config: MockAssessorConfig,
}

impl MockDamageAssessor {
    pub const MODEL_VERSION: &'static str = "mock-assessor-1.0";

    pub fn new(config: MockAssessorConfig) -> Result<Self, ClaimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MockAssessorConfig {
        &self.config
    }

    fn assess_one(&self, index: usize, photo: &PhotoUpload) -> PhotoAssessment {
        let count: usize = (self.config.min_damages..self.config.max_damages + 1).fake();

        PhotoAssessment {
            photo_index: index,
            photo_url: photo.to_data_url(),
            bounding_boxes: (0..count).map(random_box).collect(),
            damages: self.random_damages(count),
            agent_notes: String::new(),
        }
    }

    fn random_damages(&self, count: usize) -> Vec<DamageItem> {
        let mut locations: Vec<&str> = VEHICLE_LOCATIONS.to_vec();

        (0..count)
            .map(|i| {
                let location = locations.swap_remove((0..locations.len()).fake::<usize>());
                let cost: u32 = (self.config.min_cost..self.config.max_cost).fake();
                DamageItem {
                    id: format!("damage-{}", i),
                    location: location.to_string(),
                    damage: pick(DAMAGE_TYPES).to_string(),
                    estimated_cost: Decimal::from(cost),
                    adjusted_cost: None,
                    adjustment_reason: None,
                }
            })
            .collect()
    }
}

impl Default for MockDamageAssessor {
    fn default() -> Self {
        Self {
            config: MockAssessorConfig::default(),
        }
    }
}

#[async_trait]
impl DamageAssessor for MockDamageAssessor {
    async fn assess(&self, photos: &[PhotoUpload]) -> Result<Vec<PhotoAssessment>, ClaimError> {
        if photos.is_empty() {
            return Err(ClaimError::NoPhotos);
        }
        Ok(photos
            .iter()
            .enumerate()
            .map(|(index, photo)| self.assess_one(index, photo))
            .collect())
    }

    fn model_version(&self) -> &str {
        Self::MODEL_VERSION
    }
}

fn pick<'a>(values: &[&'a str]) -> &'a str {
    values[(0..values.len()).fake::<usize>()]
}

fn random_box(i: usize) -> BoundingBox {
    BoundingBox {
        id: format!("bbox-{}", i),
        x: (10.0..70.0).fake::<f64>(),
        y: (10.0..70.0).fake::<f64>(),
        width: (10.0..30.0).fake::<f64>(),
        height: (10.0..30.0).fake::<f64>(),
        label: pick(DAMAGE_TYPES).to_string(),
    }
}
