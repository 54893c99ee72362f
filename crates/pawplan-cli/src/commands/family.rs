use clap::Subcommand;
use pawplan_core::chore::Kid;
use pawplan_core::store::ChoreStore;

use super::{open_store, save_store, CliResult};

#[derive(Subcommand)]
pub enum FamilyAction {
    /// Add a kid to the family
    AddKid {
        username: String,
        #[arg(long, default_value = "family-1")]
        family: String,
    },
    /// Show a kid's record, including the points balance
    ShowKid {
        kid_id: String,
        #[arg(long, default_value = "family-1")]
        family: String,
    },
}

pub fn run(action: FamilyAction) -> CliResult {
    let store = open_store()?;

    match action {
        FamilyAction::AddKid { username, family } => {
            let kid = Kid::new(family, username);
            store.put_kid(&kid)?;
            save_store(&store)?;
            println!("{}", serde_json::to_string_pretty(&kid)?);
        }
        FamilyAction::ShowKid { kid_id, family } => {
            let kid = store.kid(&family, &kid_id)?.ok_or("kid not found")?;
            println!("{}", serde_json::to_string_pretty(&kid)?);
        }
    }
    Ok(())
}
