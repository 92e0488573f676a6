//! launchgrid-core: headless engine for the launchgrid shortcut launcher.
//!
//! Everything the desktop shell needs lives here: the SQLite shortcut store,
//! the launch invoker, icon resolution and caching, timed backups, search,
//! and persisted settings. The crate has no UI dependency so the engine can
//! be exercised and tested without a display.

pub mod backup;
pub mod config;
pub mod error;
pub mod icon;
pub mod launch;
pub mod models;
pub mod platform;
pub mod search;
pub mod settings;
pub mod store;

pub use backup::{BackupManager, BackupOutcome};
pub use error::{LaunchgridError, Result};
pub use icon::{IconImage, IconResolver};
pub use launch::{launch, LaunchRequest};
pub use models::{Button, ButtonSpec, Group};
pub use search::{search, HitKind, SearchHit};
pub use settings::Settings;
pub use store::ShortcutStore;

use platform::paths::DataLayout;
use std::path::Path;
use tracing::info;

/// The assembled engine: store, backups, and icons rooted in one data
/// directory. The desktop shell owns exactly one of these.
pub struct Launchgrid {
    layout: DataLayout,
    store: ShortcutStore,
    backups: BackupManager,
    icons: IconResolver,
}

impl Launchgrid {
    /// Open the engine rooted at the given data directory, creating the
    /// directory tree, database, and default group as needed.
    pub fn new(data_root: impl AsRef<Path>) -> Result<Self> {
        let layout = DataLayout::new(data_root.as_ref());
        layout.ensure_dirs()?;

        let store = ShortcutStore::open(layout.db_path())?;
        store.ensure_default_group()?;

        let backups = BackupManager::new(layout.db_path(), layout.backups_dir());
        let icons = IconResolver::new(layout.icons_dir());

        info!("Opened data root at {:?}", layout.root());
        Ok(Self {
            layout,
            store,
            backups,
            icons,
        })
    }

    /// Open the engine in the per-user data directory.
    pub fn open_default() -> Result<Self> {
        Self::new(platform::paths::default_data_root()?)
    }

    pub fn store(&self) -> &ShortcutStore {
        &self.store
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    pub fn icons(&self) -> &IconResolver {
        &self.icons
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Load persisted settings, defaulting when absent or corrupt.
    pub fn load_settings(&self) -> Settings {
        Settings::load(&self.layout.settings_path())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.save(&self.layout.settings_path())
    }

    /// Checkpoint the database and take a backup unless one ran very
    /// recently. The checkpoint makes the file-level copy complete under WAL.
    pub fn backup_now(&self) -> Result<BackupOutcome> {
        self.store.checkpoint()?;
        self.backups.backup_now()
    }

    /// Launch one stored button.
    pub fn launch_button(&self, button: &Button) -> Result<()> {
        launch::launch(&LaunchRequest::from_button(button))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_engine_bootstrap() {
        let temp = TempDir::new().unwrap();
        let engine = Launchgrid::new(temp.path()).unwrap();

        // Bootstrap created the directory tree and the default group.
        assert!(engine.layout().backups_dir().is_dir());
        assert!(engine.layout().icons_dir().is_dir());
        let groups = engine.store().get_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, config::AppConfig::DEFAULT_GROUP_NAME);

        // Settings default cleanly before any save.
        assert_eq!(engine.load_settings(), Settings::default());
    }

    #[test]
    fn test_reopen_preserves_data() {
        let temp = TempDir::new().unwrap();
        {
            let engine = Launchgrid::new(temp.path()).unwrap();
            let gid = engine.store().get_groups()[0].id;
            engine
                .store()
                .add_button(
                    gid,
                    &ButtonSpec {
                        name: "ls".into(),
                        path: "/bin/ls".into(),
                        ..Default::default()
                    },
                )
                .unwrap();
            engine
                .save_settings(&Settings {
                    window_width: 1000.0,
                    ..Settings::default()
                })
                .unwrap();
        }

        let engine = Launchgrid::new(temp.path()).unwrap();
        assert_eq!(engine.store().get_all_buttons().len(), 1);
        // An existing (even empty-of-buttons) group set suppresses the default.
        assert_eq!(engine.store().get_groups().len(), 1);
        assert_eq!(engine.load_settings().window_width, 1000.0);
    }
}
