//! Static care instructions.
//!
//! Looked up by (task type, species, life stage, task name). The tables
//! are plain matches resolved at compile time; unknown combinations fall
//! back to a generic instruction instead of erroring.

use crate::chore::TaskType;
use crate::pet::{LifeStage, Species};

/// Step-by-step guidance for a task, suitable for display next to it.
pub fn instructions(
    task_type: TaskType,
    species: Species,
    stage: LifeStage,
    task_name: &str,
) -> &'static str {
    // Name-specific entries win over the type tables.
    match task_name {
        "evening_walk" => {
            return "Clip the leash on, bring water and bags, and keep the walk \
                    to at least 20 minutes. Stay on lit paths after dusk."
        }
        "water_refill" => {
            return "Empty the bowl, rinse it with warm water, and refill with \
                    fresh water. Check for slime on the bowl rim."
        }
        _ => {}
    }

    match (task_type, species) {
        (TaskType::Feeding, Species::BeardedDragon) => match stage {
            LifeStage::Baby => {
                "Offer appropriately sized insects three times today; dust one \
                 feeding with calcium. Remove uneaten insects after 10 minutes."
            }
            LifeStage::Juvenile => {
                "Two insect feedings plus a small plate of chopped greens. \
                 Dust insects with calcium every other day."
            }
            LifeStage::SubAdult => {
                "One insect feeding and a fresh salad. Start shifting the \
                 ratio toward greens."
            }
            LifeStage::Adult => {
                "Salad first, insects every other day. Watch portion size; \
                 adults gain weight easily."
            }
        },
        (TaskType::Habitat, Species::BeardedDragon) => {
            "Spot-clean the enclosure, check basking-spot temperature \
             (38-42 C) and swap the UVB bulb if past its service life."
        }
        (TaskType::Health, Species::BeardedDragon) => {
            "Weigh on the kitchen scale and note the grams. Look over eyes, \
             vent, and toes; flag anything unusual to a parent."
        }
        (TaskType::Feeding, Species::Dog) => {
            "Measure the kibble, no table scraps. Fresh water alongside."
        }
        (TaskType::Feeding, Species::Cat) => {
            "Portion per the bag's feeding chart. Wash the bowl before refilling."
        }
        (TaskType::Exercise, Species::Dog) => {
            "At least 20 minutes outside. Vary the route so it stays interesting."
        }
        _ => "Follow the routine a parent showed you, and ask if anything looks off.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dragon_feeding_varies_by_stage() {
        let baby = instructions(
            TaskType::Feeding,
            Species::BeardedDragon,
            LifeStage::Baby,
            "feed_dragon",
        );
        let adult = instructions(
            TaskType::Feeding,
            Species::BeardedDragon,
            LifeStage::Adult,
            "feed_dragon",
        );
        assert_ne!(baby, adult);
        assert!(baby.contains("three times"));
    }

    #[test]
    fn task_name_entries_override_type_tables() {
        let walk = instructions(
            TaskType::Exercise,
            Species::Dog,
            LifeStage::Adult,
            "evening_walk",
        );
        assert!(walk.contains("leash"));
    }

    #[test]
    fn unknown_combinations_get_the_generic_fallback() {
        let text = instructions(
            TaskType::Other,
            Species::Unknown,
            LifeStage::Adult,
            "mystery_task",
        );
        assert!(text.contains("ask"));
    }
}
