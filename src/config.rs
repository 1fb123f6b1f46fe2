use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::ui_state::UI_STATE_KEY;

pub const CONFIG_VERSION: u64 = 1;

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV: &str = "SMART_TODO_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8001/api";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("smart-todo")
}

fn default_version() -> u64 {
    CONFIG_VERSION
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api_base_url: default_api_base_url(),
            state_dir: default_state_dir(),
            debug_logging: false,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("smart-todo")
            .join("config.json")
    }

    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::default_path());
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(&url);
        }
        config
    }

    /// Read a config file. Missing or malformed files give defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read config {}: {}", path.display(), e);
                }
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn apply_api_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.api_base_url = url.to_string();
        }
    }

    /// Where the persisted filter/sidebar state lives.
    pub fn ui_state_path(&self) -> PathBuf {
        self.state_dir.join(format!("{}.json", UI_STATE_KEY))
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.state_dir)
    }
}
