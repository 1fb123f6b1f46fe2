use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version written alongside the persisted UI slice.
pub const UI_STATE_VERSION: u32 = 1;

/// Namespace key the UI slice is stored under.
pub const UI_STATE_KEY: &str = "smart-todo-storage";

fn all() -> String {
    "all".to_string()
}

/// Filter selectors and layout flags. The only state that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    #[serde(default = "all")]
    pub status_filter: String,
    #[serde(default = "all")]
    pub category_filter: String,
    #[serde(default = "all")]
    pub priority_filter: String,
    #[serde(default)]
    pub sidebar_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status_filter: all(),
            category_filter: all(),
            priority_filter: all(),
            sidebar_open: false,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    state: &'a UiState,
}

#[derive(Deserialize)]
struct StoredEnvelope {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    state: UiState,
}

/// Load the persisted UI slice, falling back to defaults on any problem.
pub fn load_ui_state(path: &Path) -> UiState {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::error!("Failed to read UI state {}: {}", path.display(), e);
            }
            return UiState::default();
        }
    };

    match serde_json::from_str::<StoredEnvelope>(&content) {
        Ok(stored) => {
            if stored.version > UI_STATE_VERSION {
                log::debug!(
                    "UI state written by schema v{} (current v{}), reading known fields only",
                    stored.version,
                    UI_STATE_VERSION
                );
            }
            stored.state
        }
        Err(e) => {
            log::error!("Discarding unreadable UI state {}: {}", path.display(), e);
            UiState::default()
        }
    }
}

pub fn save_ui_state(path: &Path, state: &UiState) {
    let envelope = Envelope {
        version: UI_STATE_VERSION,
        state,
    };
    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::error!("Failed to create {}: {}", parent.display(), e);
                    return;
                }
            }
            if let Err(e) = std::fs::write(path, json) {
                log::error!("Failed to save UI state: {}", e);
            }
        }
        Err(e) => log::error!("Failed to serialize UI state: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.json", UI_STATE_KEY, uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        assert_eq!(load_ui_state(&temp_path()), UiState::default());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path();
        let state = UiState {
            status_filter: "completed".to_string(),
            category_filter: "3".to_string(),
            priority_filter: "high".to_string(),
            sidebar_open: true,
        };
        save_ui_state(&path, &state);
        assert_eq!(load_ui_state(&path), state);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"version\": 1"));
        assert!(raw.contains("\"statusFilter\""));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn newer_schema_with_extra_fields_is_tolerated() {
        let path = temp_path();
        std::fs::write(
            &path,
            r#"{"version": 7, "state": {"statusFilter": "pending", "sidebarOpen": true, "theme": "dark"}}"#,
        )
        .unwrap();
        let state = load_ui_state(&path);
        assert_eq!(state.status_filter, "pending");
        assert_eq!(state.category_filter, "all");
        assert!(state.sidebar_open);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let path = temp_path();
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(load_ui_state(&path), UiState::default());
        let _ = std::fs::remove_file(&path);
    }
}
