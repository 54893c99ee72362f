use clap::Subcommand;
use pawplan_core::chore::{CareSchedule, Frequency, TaskType};
use pawplan_core::store::ChoreStore;

use super::{open_store, save_store, CliResult};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// List the family's schedules
    List {
        #[arg(long, default_value = "family-1")]
        family: String,
    },
    /// Create a recurring care schedule
    Add {
        /// Pet the obligation is for
        pet_id: String,
        /// Task name, e.g. feed_dragon
        task_name: String,
        #[arg(long, default_value = "family-1")]
        family: String,
        #[arg(long, default_value_t = 10)]
        points: i64,
        /// Kids in rotation order (repeatable)
        #[arg(long = "kid", required = true)]
        kids: Vec<String>,
        /// daily or weekly
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// 0 = Sunday ... 6 = Saturday (weekly schedules)
        #[arg(long)]
        day_of_week: Option<u8>,
        /// "HH:MM" due time
        #[arg(long)]
        due_time: Option<String>,
        /// feeding, habitat, health, or exercise
        #[arg(long)]
        task_type: Option<String>,
    },
    /// Deactivate a schedule
    Deactivate {
        schedule_id: String,
        #[arg(long, default_value = "family-1")]
        family: String,
    },
}

pub fn run(action: ScheduleAction) -> CliResult {
    let store = open_store()?;

    match action {
        ScheduleAction::List { family } => {
            let schedules = store.schedules(&family)?;
            println!("{}", serde_json::to_string_pretty(&schedules)?);
        }
        ScheduleAction::Add {
            pet_id,
            task_name,
            family,
            points,
            kids,
            frequency,
            day_of_week,
            due_time,
            task_type,
        } => {
            let mut schedule = CareSchedule::new(family, pet_id, task_name, points, kids);
            schedule.frequency = match frequency.as_str() {
                "daily" => Frequency::Daily,
                "weekly" => Frequency::Weekly,
                other => return Err(format!("unknown frequency '{other}'").into()),
            };
            schedule.day_of_week = day_of_week;
            schedule.due_time = due_time;
            if let Some(raw) = task_type {
                // Reuse the wire-form parsing; unknown types fall back.
                schedule.task_type = serde_json::from_value(serde_json::Value::String(raw))
                    .unwrap_or(TaskType::Other);
            }
            store.put_schedule(&schedule)?;
            save_store(&store)?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }
        ScheduleAction::Deactivate {
            schedule_id,
            family,
        } => {
            let mut schedule = store
                .schedule(&family, &schedule_id)?
                .ok_or("schedule not found")?;
            schedule.active = false;
            store.put_schedule(&schedule)?;
            save_store(&store)?;
            println!("deactivated {}", schedule.id);
        }
    }
    Ok(())
}
