mod config;
mod seen;

pub use config::{Config, DisplayCount};
pub use seen::SeenSet;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

const SEEN_FILE: &str = "seen.json";
const CONFIG_FILE: &str = "config.json";

/// Returns the data directory, creating it if needed.
///
/// `HN_PULSE_DATA_DIR` overrides the location outright. Otherwise the
/// platform data directory is used (`~/.local/share/hn-pulse` on Linux), or
/// `hn-pulse-dev` when `HN_PULSE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("HN_PULSE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            let env = std::env::var("HN_PULSE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base.join("hn-pulse-dev")
            } else {
                base.join("hn-pulse")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Persistence for the seen-set and the user config.
///
/// Loads never fail: anything missing or unreadable comes back as the empty
/// set / default config. Saves overwrite the whole record.
pub trait StateStore {
    fn load_seen(&self) -> SeenSet;

    /// True when no baseline exists yet: the seen record is absent, empty, or
    /// unreadable.
    fn is_first_run(&self) -> bool;

    fn save_seen(&mut self, seen: &SeenSet) -> Result<()>;

    fn load_config(&self) -> Config;

    fn save_config(&mut self, config: &Config) -> Result<()>;
}

/// `seen.json` + `config.json` in one directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at [`data_dir`].
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?))
    }

    pub fn seen_path(&self) -> PathBuf {
        self.dir.join(SEEN_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    fn read_seen(&self) -> Option<SeenSet> {
        let text = std::fs::read_to_string(self.seen_path()).ok()?;
        match serde_json::from_str(&text) {
            Ok(seen) => Some(seen),
            Err(e) => {
                tracing::warn!("discarding unreadable {}: {e}", self.seen_path().display());
                None
            }
        }
    }
}

impl StateStore for JsonStore {
    fn load_seen(&self) -> SeenSet {
        self.read_seen().unwrap_or_default()
    }

    fn is_first_run(&self) -> bool {
        self.read_seen().map_or(true, |seen| seen.is_empty())
    }

    fn save_seen(&mut self, seen: &SeenSet) -> Result<()> {
        let content = serde_json::to_string(seen)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.seen_path(), content)?;
        Ok(())
    }

    fn load_config(&self) -> Config {
        match std::fs::read_to_string(self.config_path()) {
            Ok(text) => Config::from_json(&text),
            Err(_) => Config::default(),
        }
    }

    fn save_config(&mut self, config: &Config) -> Result<()> {
        let path = self.config_path();
        let content = serde_json::to_string_pretty(config)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs. `fail_writes` makes every save
/// return an error without touching the stored state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub seen: Option<SeenSet>,
    pub config: Option<Config>,
    pub fail_writes: bool,
    pub seen_saves: usize,
    pub config_saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds a baseline.
    pub fn with_seen<I: IntoIterator<Item = u64>>(ids: I) -> Self {
        Self {
            seen: Some(ids.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }
}

impl StateStore for MemoryStore {
    fn load_seen(&self) -> SeenSet {
        self.seen.clone().unwrap_or_default()
    }

    fn is_first_run(&self) -> bool {
        self.seen.as_ref().map_or(true, SeenSet::is_empty)
    }

    fn save_seen(&mut self, seen: &SeenSet) -> Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::other("memory store is read-only").into());
        }
        self.seen = Some(seen.clone());
        self.seen_saves += 1;
        Ok(())
    }

    fn load_config(&self) -> Config {
        self.config.clone().unwrap_or_default()
    }

    fn save_config(&mut self, config: &Config) -> Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::other("memory store is read-only").into());
        }
        self.config = Some(config.clone());
        self.config_saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSet;

    #[test]
    fn missing_files_mean_first_run_and_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::new(tmp.path());
        assert!(store.is_first_run());
        assert!(store.load_seen().is_empty());
        assert_eq!(store.load_config(), Config::default());
    }

    #[test]
    fn corrupt_seen_file_is_first_run() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(SEEN_FILE), "{{{").unwrap();
        let store = JsonStore::new(tmp.path());
        assert!(store.is_first_run());
        assert!(store.load_seen().is_empty());
    }

    #[test]
    fn empty_array_is_first_run() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(SEEN_FILE), "[]").unwrap();
        assert!(JsonStore::new(tmp.path()).is_first_run());
    }

    #[test]
    fn seen_roundtrip_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(tmp.path());

        let seen: SeenSet = [3, 1, 2].into_iter().collect();
        store.save_seen(&seen).unwrap();
        assert!(!store.is_first_run());
        assert_eq!(store.load_seen(), seen);

        let fewer: SeenSet = [9].into_iter().collect();
        store.save_seen(&fewer).unwrap();
        assert_eq!(std::fs::read_to_string(store.seen_path()).unwrap(), "[9]");
    }

    #[test]
    fn config_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(tmp.path());
        let cfg = Config {
            max_display_count: DisplayCount::new(5).unwrap(),
            filter_set: FilterSet::new(["rust", "zig"]),
        };
        store.save_config(&cfg).unwrap();
        assert_eq!(store.load_config(), cfg);
    }

    #[test]
    fn save_into_missing_directory_creates_it() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(tmp.path().join("nested").join("dir"));
        store.save_seen(&[1].into_iter().collect()).unwrap();
        assert!(store.seen_path().exists());
    }

    #[test]
    fn memory_store_refuses_writes_when_asked() {
        let mut store = MemoryStore::with_seen([1]);
        store.fail_writes = true;
        assert!(store.save_seen(&SeenSet::new()).is_err());
        assert_eq!(store.load_seen().len(), 1);
        assert_eq!(store.seen_saves, 0);
    }
}
