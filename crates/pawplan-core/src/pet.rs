//! Pet model and age/life-stage classification.
//!
//! Classification is pure table lookup: age in whole months from the pet's
//! birthday, species-specific stage thresholds, and per-stage care
//! recommendations (feeding cadence, diet ratio, healthy-weight interval).
//! The bearded dragon is the modeled species; anything else classifies as
//! an adult and gets generic recommendations.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Pet species.
///
/// Closed enum: unknown wire values deserialize to `Unknown` instead of
/// failing, and classify as adults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    BeardedDragon,
    Dog,
    Cat,
    #[serde(other)]
    Unknown,
}

/// Life stage derived from age in months.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LifeStage {
    Baby,
    Juvenile,
    SubAdult,
    Adult,
}

/// Weight relative to the stage's healthy interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeightStatus {
    Underweight,
    Healthy,
    Overweight,
}

/// A pet owned by the family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub family_id: String,
    pub name: String,
    pub species: Species,
    /// Civil birth date. Age arithmetic never mixes this with
    /// timezone-aware values; callers pass a civil reference date too.
    pub birthday: NaiveDate,
}

impl Pet {
    pub fn new(
        family_id: impl Into<String>,
        name: impl Into<String>,
        species: Species,
        birthday: NaiveDate,
    ) -> Self {
        Pet {
            id: format!("pet-{}", uuid::Uuid::new_v4()),
            family_id: family_id.into(),
            name: name.into(),
            species,
            birthday,
        }
    }

    /// Age in whole months at `reference`.
    pub fn age_months(&self, reference: NaiveDate) -> u32 {
        age_months(self.birthday, reference)
    }

    /// Life stage at `reference`.
    pub fn life_stage(&self, reference: NaiveDate) -> LifeStage {
        life_stage(self.species, self.age_months(reference))
    }
}

/// Whole months elapsed between `birthday` and `reference`.
///
/// Month difference, minus one when the reference day-of-month has not yet
/// reached the birthday's day-of-month. Clamped at zero for reference dates
/// before the birthday.
pub fn age_months(birthday: NaiveDate, reference: NaiveDate) -> u32 {
    let mut months = (reference.year() - birthday.year()) * 12
        + (reference.month() as i32 - birthday.month() as i32);
    if reference.day() < birthday.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Species-specific life stage from age in months.
///
/// Bearded dragon thresholds: 0-2 baby, 3-11 juvenile, 12-17 sub-adult,
/// 18+ adult. Unmodeled species are treated as adults.
pub fn life_stage(species: Species, age_months: u32) -> LifeStage {
    match species {
        Species::BeardedDragon => match age_months {
            0..=2 => LifeStage::Baby,
            3..=11 => LifeStage::Juvenile,
            12..=17 => LifeStage::SubAdult,
            _ => LifeStage::Adult,
        },
        _ => LifeStage::Adult,
    }
}

/// Static per-stage care recommendation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CareRecommendation {
    /// How often to feed, human-readable.
    pub feeding_cadence: &'static str,
    /// Insect/greens split for dragons, or a generic note otherwise.
    pub diet_ratio: &'static str,
    /// Inclusive healthy-weight interval in grams.
    pub healthy_weight_grams: (u32, u32),
}

/// Look up the care recommendation for a species and stage.
pub fn care_recommendations(species: Species, stage: LifeStage) -> CareRecommendation {
    match (species, stage) {
        (Species::BeardedDragon, LifeStage::Baby) => CareRecommendation {
            feeding_cadence: "3x daily",
            diet_ratio: "80% insects / 20% greens",
            healthy_weight_grams: (10, 50),
        },
        (Species::BeardedDragon, LifeStage::Juvenile) => CareRecommendation {
            feeding_cadence: "2x daily",
            diet_ratio: "70% insects / 30% greens",
            healthy_weight_grams: (50, 200),
        },
        (Species::BeardedDragon, LifeStage::SubAdult) => CareRecommendation {
            feeding_cadence: "1x daily",
            diet_ratio: "50% insects / 50% greens",
            healthy_weight_grams: (200, 380),
        },
        (Species::BeardedDragon, LifeStage::Adult) => CareRecommendation {
            feeding_cadence: "every other day",
            diet_ratio: "20% insects / 80% greens",
            healthy_weight_grams: (380, 550),
        },
        (Species::Dog, _) => CareRecommendation {
            feeding_cadence: "2x daily",
            diet_ratio: "complete dog food",
            healthy_weight_grams: (4_000, 40_000),
        },
        (Species::Cat, _) => CareRecommendation {
            feeding_cadence: "2x daily",
            diet_ratio: "complete cat food",
            healthy_weight_grams: (3_000, 6_000),
        },
        (Species::Unknown, _) => CareRecommendation {
            feeding_cadence: "per veterinary guidance",
            diet_ratio: "per veterinary guidance",
            healthy_weight_grams: (0, u32::MAX),
        },
    }
}

/// Classify a measured weight against the stage's inclusive interval.
pub fn evaluate_weight(species: Species, stage: LifeStage, grams: u32) -> WeightStatus {
    let (min, max) = care_recommendations(species, stage).healthy_weight_grams;
    if grams < min {
        WeightStatus::Underweight
    } else if grams > max {
        WeightStatus::Overweight
    } else {
        WeightStatus::Healthy
    }
}
