//! Data directory resolution.

use crate::config::{AppConfig, PathsConfig};
use crate::error::{LaunchgridError, Result};
use std::path::{Path, PathBuf};

/// Per-user application data root, e.g. `~/.local/share/launchgrid` on Linux
/// or `%APPDATA%\launchgrid` on Windows.
pub fn default_data_root() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| LaunchgridError::Config {
        message: "Could not determine user data directory".to_string(),
    })?;
    Ok(base.join(AppConfig::APP_NAME))
}

/// Well-known file and directory locations under a data root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(PathsConfig::DB_FILENAME)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join(PathsConfig::BACKUPS_DIR_NAME)
    }

    pub fn icons_dir(&self) -> PathBuf {
        self.root.join(PathsConfig::ICONS_DIR_NAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(PathsConfig::SETTINGS_FILENAME)
    }

    /// Create the root and its subdirectories.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.root.clone(), self.backups_dir(), self.icons_dir()] {
            std::fs::create_dir_all(&dir)
                .map_err(|e| LaunchgridError::io_with_path(e, &dir))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let temp = TempDir::new().unwrap();
        let layout = DataLayout::new(temp.path());

        assert_eq!(layout.db_path(), temp.path().join("launcher.db"));
        assert_eq!(layout.backups_dir(), temp.path().join("backups"));
        assert_eq!(layout.icons_dir(), temp.path().join("icons"));
        assert_eq!(layout.settings_path(), temp.path().join("settings.json"));

        layout.ensure_dirs().unwrap();
        assert!(layout.backups_dir().is_dir());
        assert!(layout.icons_dir().is_dir());
    }
}
