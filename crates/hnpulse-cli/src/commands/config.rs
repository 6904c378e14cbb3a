use std::path::PathBuf;

use clap::Subcommand;
use hnpulse_core::{Config, StateStore};

use super::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key ("max_display_count" or "filters")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value (filters are comma separated; empty clears them)
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(data_dir: Option<PathBuf>, action: ConfigAction) -> CliResult {
    let mut store = super::open_store(data_dir)?;
    match action {
        ConfigAction::Get { key } => {
            let config = store.load_config();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key} (known: {})", Config::keys().join(", "));
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = store.load_config();
            config.set(&key, &value)?;
            store.save_config(&config)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = store.load_config();
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            store.save_config(&Config::default())?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
