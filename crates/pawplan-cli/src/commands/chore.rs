use clap::Subcommand;
use pawplan_core::store::ChoreStore;
use pawplan_core::{ApprovalEngine, CoreConfig, Identity};

use super::{open_store, save_store, CliResult};

#[derive(Subcommand)]
pub enum ChoreAction {
    /// List a kid's tasks (or the whole family's)
    List {
        #[arg(long, default_value = "family-1")]
        family: String,
        #[arg(long)]
        kid: Option<String>,
    },
    /// Submit a completed task
    Submit {
        task_id: String,
        /// Submitting kid's id
        #[arg(long)]
        kid: String,
        #[arg(long, default_value = "family-1")]
        family: String,
        #[arg(long)]
        notes: Option<String>,
        /// Self-reported minutes of effort
        #[arg(long)]
        effort_minutes: Option<u32>,
    },
    /// Approve a pending submission
    Approve {
        task_id: String,
        /// Reviewing parent's id
        #[arg(long)]
        parent: String,
        #[arg(long, default_value = "family-1")]
        family: String,
    },
    /// Reject a pending submission
    Reject {
        task_id: String,
        #[arg(long)]
        parent: String,
        #[arg(long, default_value = "family-1")]
        family: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

pub fn run(action: ChoreAction) -> CliResult {
    let config = CoreConfig::load()?;
    let store = open_store()?;

    match action {
        ChoreAction::List { family, kid } => {
            let tasks = match kid {
                Some(kid) => store.submissions_for_kid(&family, &kid)?,
                None => {
                    let kid_ids: std::collections::HashSet<String> = store
                        .schedules(&family)?
                        .into_iter()
                        .flat_map(|s| s.assigned_kid_ids)
                        .collect();
                    let mut all = Vec::new();
                    for kid_id in &kid_ids {
                        all.extend(store.submissions_for_kid(&family, kid_id)?);
                    }
                    all.sort_by_key(|t| t.due_date);
                    all
                }
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
            return Ok(());
        }
        ChoreAction::Submit {
            task_id,
            kid,
            family,
            notes,
            effort_minutes,
        } => {
            let engine = ApprovalEngine::with_config(store, &config);
            let task = engine.submit(
                &task_id,
                &Identity::kid(kid, family),
                notes,
                effort_minutes,
            )?;
            save_store(engine.store())?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        ChoreAction::Approve {
            task_id,
            parent,
            family,
        } => {
            let engine = ApprovalEngine::with_config(store, &config);
            let result = engine.approve(&task_id, &Identity::parent(parent, family));
            // The auto-reject path mutates the task before erroring, so the
            // snapshot is saved either way.
            save_store(engine.store())?;
            let task = result?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        ChoreAction::Reject {
            task_id,
            parent,
            family,
            reason,
        } => {
            let engine = ApprovalEngine::with_config(store, &config);
            let task = engine.reject(&task_id, &Identity::parent(parent, family), reason)?;
            save_store(engine.store())?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
    }
    Ok(())
}
