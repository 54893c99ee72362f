use chrono::NaiveDate;
use clap::Subcommand;
use pawplan_core::{CoreConfig, StreakCalculator};

use super::{open_store, resolve_date, CliResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Show a kid's current streak
    Show {
        kid_id: String,
        #[arg(long, default_value = "family-1")]
        family: String,
        /// Evaluate as of this date (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: StreakAction) -> CliResult {
    match action {
        StreakAction::Show {
            kid_id,
            family,
            date,
        } => {
            let config = CoreConfig::load()?;
            let store = open_store()?;
            let calc = StreakCalculator::from_config(&config.streak);
            let summary = calc.for_kid(&store, &family, &kid_id, resolve_date(date))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
