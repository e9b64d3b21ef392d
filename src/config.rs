use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("zenstudy")
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("zenstudy")
        .join("config.json")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ZenConfig {
    pub data_dir: PathBuf,
}

impl Default for ZenConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl ZenConfig {
    /// Directory holding the key-value store (one JSON file per key).
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Ensure the data and store directories exist.
    pub fn ensure_files(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.store_dir())
    }

    /// Load the config file, falling back to defaults when it is missing or malformed.
    pub fn load() -> Self {
        match std::fs::read_to_string(config_path()) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create config directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log::error!("Failed to save config: {}", e);
                }
            }
            Err(e) => log::error!("Failed to serialize config: {}", e),
        }
    }
}
