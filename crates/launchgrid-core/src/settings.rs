//! Persisted application settings.
//!
//! A small JSON object in the data root. Loading never fails: a missing or
//! unreadable file falls back to defaults so the launcher always starts.

use crate::config::UiConfig;
use crate::error::{LaunchgridError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: f32,
    pub window_height: f32,
    pub backup_on_exit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: UiConfig::WINDOW_WIDTH,
            window_height: UiConfig::WINDOW_HEIGHT,
            backup_on_exit: true,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Corrupt settings file {:?}, using defaults: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LaunchgridError::io_with_path(e, parent))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| LaunchgridError::io_with_path(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");

        let settings = Settings {
            window_width: 1024.0,
            window_height: 768.0,
            backup_on_exit: false,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = Settings::load(&temp.path().join("absent.json"));
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"window_width": 900.0, "theme": "dark"}"#).unwrap();
        let loaded = Settings::load(&path);
        assert_eq!(loaded.window_width, 900.0);
        assert!(loaded.backup_on_exit);
    }
}
