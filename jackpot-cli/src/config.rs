use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the sqlite file inside the data directory.
pub const DB_FILE: &str = "jackpot.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    /// Label the caller address is derived from.
    pub caller: String,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("jackpot"),
            caller: "admin".to_string(),
            verbose: false,
        }
    }
}

impl CliConfig {
    pub fn new(data_dir: Option<PathBuf>, caller: String, verbose: bool) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: data_dir.unwrap_or(defaults.data_dir),
            caller,
            verbose,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
