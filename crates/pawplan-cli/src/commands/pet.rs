use chrono::NaiveDate;
use clap::Subcommand;
use pawplan_core::pet::{self, Pet, Species};
use pawplan_core::store::ChoreStore;

use super::{open_store, resolve_date, save_store, CliResult};

#[derive(Subcommand)]
pub enum PetAction {
    /// Register a pet
    Add {
        name: String,
        /// bearded_dragon, dog, or cat
        species: String,
        /// Birth date, YYYY-MM-DD
        birthday: NaiveDate,
        #[arg(long, default_value = "family-1")]
        family: String,
    },
    /// Age, life stage, and care recommendation for a pet
    Status {
        pet_id: String,
        #[arg(long, default_value = "family-1")]
        family: String,
        /// Current weight in grams, to check against the healthy interval
        #[arg(long)]
        weight: Option<u32>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: PetAction) -> CliResult {
    let store = open_store()?;

    match action {
        PetAction::Add {
            name,
            species,
            birthday,
            family,
        } => {
            // Unknown species strings are accepted and classify as adults.
            let species: Species = serde_json::from_value(serde_json::Value::String(species))
                .unwrap_or(Species::Unknown);
            let pet = Pet::new(family, name, species, birthday);
            store.put_pet(&pet)?;
            save_store(&store)?;
            println!("{}", serde_json::to_string_pretty(&pet)?);
        }
        PetAction::Status {
            pet_id,
            family,
            weight,
            date,
        } => {
            let found = store.pet(&family, &pet_id)?.ok_or("pet not found")?;
            let today = resolve_date(date);
            let age = found.age_months(today);
            let stage = found.life_stage(today);
            let recommendation = pet::care_recommendations(found.species, stage);

            println!("{} ({:?})", found.name, found.species);
            println!("  age: {age} months, stage {stage:?}");
            println!("  feeding: {}", recommendation.feeding_cadence);
            println!("  diet: {}", recommendation.diet_ratio);
            let (min, max) = recommendation.healthy_weight_grams;
            println!("  healthy weight: {min}-{max} g");
            if let Some(grams) = weight {
                let status = pet::evaluate_weight(found.species, stage, grams);
                println!("  weight check: {grams} g -> {status:?}");
            }
        }
    }
    Ok(())
}
