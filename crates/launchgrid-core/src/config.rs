//! Centralized configuration constants for launchgrid.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "launchgrid";
    /// Name of the group created automatically when the store is empty.
    pub const DEFAULT_GROUP_NAME: &'static str = "默认分组";
}

/// Shared directory and file names under the data root.
pub struct PathsConfig;

impl PathsConfig {
    pub const DB_FILENAME: &'static str = "launcher.db";
    pub const BACKUPS_DIR_NAME: &'static str = "backups";
    pub const ICONS_DIR_NAME: &'static str = "icons";
    pub const SETTINGS_FILENAME: &'static str = "settings.json";
    pub const BACKUP_FILE_PREFIX: &'static str = "launcher_backup_";
}

/// Store behavior tuning.
pub struct StoreConfig;

impl StoreConfig {
    /// Additional attempts after the first failed read.
    pub const READ_RETRY_ATTEMPTS: u32 = 3;
    pub const READ_RETRY_DELAY: Duration = Duration::from_millis(50);
}

/// Backup scheduling and retention.
pub struct BackupConfig;

impl BackupConfig {
    /// How often the app timer asks for a backup.
    pub const INTERVAL: Duration = Duration::from_secs(3600);
    /// Requests arriving sooner than this after the last backup are skipped.
    pub const MIN_GAP: Duration = Duration::from_secs(60);
    /// Newest backups kept when pruning.
    pub const RETENTION_COUNT: usize = 5;
}

/// Icon cache parameters.
pub struct IconConfig;

impl IconConfig {
    /// Side length of cached tile icons, in pixels.
    pub const ICON_SIDE: u32 = 64;
}

/// UI dimensions and timing.
pub struct UiConfig;

impl UiConfig {
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;
    pub const TILE_WIDTH: f32 = 120.0;
    pub const TILE_HEIGHT: f32 = 60.0;
    pub const TILE_ICON_SIDE: f32 = 32.0;
    /// How long transient status messages stay visible.
    pub const STATUS_TTL: Duration = Duration::from_secs(5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intervals_are_sane() {
        assert!(BackupConfig::MIN_GAP < BackupConfig::INTERVAL);
        assert!(StoreConfig::READ_RETRY_DELAY < Duration::from_secs(1));
    }
}
