use chrono::NaiveDate;
use clap::Subcommand;
use pawplan_core::{CoreConfig, GenerationReport, GenerationRunner};

use super::{open_store, resolve_date, save_store, CliResult};

#[derive(Subcommand)]
pub enum GenerateAction {
    /// Generate tasks for every active schedule plus the evening walk
    All {
        #[arg(long, default_value = "family-1")]
        family: String,
        /// Start date (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Generate tasks for a single schedule
    Schedule {
        schedule_id: String,
        #[arg(long, default_value = "family-1")]
        family: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Generate evening-walk tasks only
    Walk {
        #[arg(long, default_value = "family-1")]
        family: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: GenerateAction) -> CliResult {
    let config = CoreConfig::load()?;
    let store = open_store()?;
    let runner = GenerationRunner::with_config(store, &config);

    let report = match action {
        GenerateAction::All { family, date } => {
            let today = resolve_date(date);
            let mut report = runner.run_all_schedules(&family, today)?;
            report.merge(runner.run_walk_pattern(&family, today)?);
            report
        }
        GenerateAction::Schedule {
            schedule_id,
            family,
            date,
        } => runner.run_schedule(&family, &schedule_id, resolve_date(date))?,
        GenerateAction::Walk { family, date } => {
            runner.run_walk_pattern(&family, resolve_date(date))?
        }
    };

    save_store(runner.store())?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    println!("{report}");
    for error in &report.errors {
        eprintln!("  failed: {error}");
    }
}
