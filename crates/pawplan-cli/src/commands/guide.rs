use chrono::Utc;
use clap::Subcommand;
use pawplan_core::pet::LifeStage;
use pawplan_core::store::ChoreStore;
use pawplan_core::{guide, Species};

use super::{open_store, CliResult};

#[derive(Subcommand)]
pub enum GuideAction {
    /// Print the care instructions for a task
    Show {
        task_id: String,
        #[arg(long, default_value = "family-1")]
        family: String,
    },
}

pub fn run(action: GuideAction) -> CliResult {
    match action {
        GuideAction::Show { task_id, family } => {
            let store = open_store()?;
            let task = store.task(&family, &task_id)?.ok_or("task not found")?;

            // Tasks without a pet (the walk) get adult-dog guidance.
            let (species, stage) = match &task.pet_id {
                Some(pet_id) => match store.pet(&family, pet_id)? {
                    Some(pet) => {
                        let today = Utc::now().date_naive();
                        (pet.species, pet.life_stage(today))
                    }
                    None => (Species::Unknown, LifeStage::Adult),
                },
                None => (Species::Dog, LifeStage::Adult),
            };

            let text = guide::instructions(task.task_type, species, stage, &task.task_name);
            println!("{} ({})", task.task_name, task.due_date);
            println!("{text}");
        }
    }
    Ok(())
}
