pub mod check;
pub mod config;
pub mod seen;
pub mod watch;

use std::path::PathBuf;

use hnpulse_core::{HnClient, JsonStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Store rooted at `--data-dir`, or the default data directory.
pub fn open_store(data_dir: Option<PathBuf>) -> Result<JsonStore, Box<dyn std::error::Error>> {
    match data_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            Ok(JsonStore::new(dir))
        }
        None => Ok(JsonStore::open_default()?),
    }
}

/// Client for the public API, or for `api_base` when given.
pub fn client(api_base: Option<&str>) -> Result<HnClient, Box<dyn std::error::Error>> {
    match api_base {
        Some(base) => Ok(HnClient::with_base_url(base)?),
        None => Ok(HnClient::new()?),
    }
}

/// Single-threaded runtime for the async commands.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread().enable_all().build()
}
