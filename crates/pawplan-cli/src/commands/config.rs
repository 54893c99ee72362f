use clap::Subcommand;
use pawplan_core::CoreConfig;

use super::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = CoreConfig::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => match CoreConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("no config directory available on this platform"),
        },
    }
    Ok(())
}
