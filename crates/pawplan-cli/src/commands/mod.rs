//! CLI command implementations.
//!
//! Every command loads the JSON state snapshot from the user data dir,
//! runs the core operation, and writes the snapshot back. State lives at
//! `~/.local/share/pawplan/state.json` (platform equivalent).

pub mod chore;
pub mod config;
pub mod family;
pub mod generate;
pub mod guide;
pub mod pet;
pub mod schedule;
pub mod streak;

use chrono::NaiveDate;
use pawplan_core::MemoryStore;
use std::path::PathBuf;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Location of the persisted store snapshot.
pub fn state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pawplan")
        .join("state.json")
}

/// Load the store; a missing snapshot yields an empty store.
pub fn open_store() -> Result<MemoryStore, Box<dyn std::error::Error>> {
    Ok(MemoryStore::load_json(&state_path())?)
}

/// Persist the store back to the snapshot file.
pub fn save_store(store: &MemoryStore) -> CliResult {
    let path = state_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    store.save_json(&path)?;
    Ok(())
}

/// Today's UTC calendar date, or an explicit override.
pub fn resolve_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| chrono::Utc::now().date_naive())
}
