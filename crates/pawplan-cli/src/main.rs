use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pawplan-cli", version, about = "Pawplan CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task generation
    Generate {
        #[command(subcommand)]
        action: commands::generate::GenerateAction,
    },
    /// Care schedule management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Chore submission and review
    Chore {
        #[command(subcommand)]
        action: commands::chore::ChoreAction,
    },
    /// Completion streaks
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Pet management and lifecycle info
    Pet {
        #[command(subcommand)]
        action: commands::pet::PetAction,
    },
    /// Family members
    Family {
        #[command(subcommand)]
        action: commands::family::FamilyAction,
    },
    /// Care instructions for a task
    Guide {
        #[command(subcommand)]
        action: commands::guide::GuideAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate { action } => commands::generate::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Chore { action } => commands::chore::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Pet { action } => commands::pet::run(action),
        Commands::Family { action } => commands::family::run(action),
        Commands::Guide { action } => commands::guide::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
