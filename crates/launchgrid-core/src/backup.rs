//! Timestamped database backups with pruning.
//!
//! The application timer calls [`BackupManager::backup_now`] once an hour and
//! again on shutdown; the manager copies the database file into the backups
//! directory and keeps only the newest few copies.

use crate::config::{BackupConfig, PathsConfig};
use crate::error::{LaunchgridError, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What a backup request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// A new backup file was written at this path.
    Created(PathBuf),
    /// Skipped: too soon after the previous backup, or nothing to back up.
    Skipped,
}

/// Copies the database into a backups directory and prunes old copies.
pub struct BackupManager {
    db_path: PathBuf,
    backups_dir: PathBuf,
    last_backup: Mutex<Option<Instant>>,
}

impl BackupManager {
    pub fn new(db_path: impl Into<PathBuf>, backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            backups_dir: backups_dir.into(),
            last_backup: Mutex::new(None),
        }
    }

    /// The directory backups are written to.
    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Take a backup unless one was taken very recently.
    ///
    /// A missing database file is not an error; there is simply nothing to
    /// back up yet.
    pub fn backup_now(&self) -> Result<BackupOutcome> {
        {
            let last = self.last_backup.lock().map_err(|e| {
                LaunchgridError::Other(format!("Backup state lock poisoned: {}", e))
            })?;
            if let Some(at) = *last {
                if at.elapsed() < BackupConfig::MIN_GAP {
                    debug!("Skipping backup, last one was {:?} ago", at.elapsed());
                    return Ok(BackupOutcome::Skipped);
                }
            }
        }

        if !self.db_path.exists() {
            debug!("No database at {:?} yet, skipping backup", self.db_path);
            return Ok(BackupOutcome::Skipped);
        }

        std::fs::create_dir_all(&self.backups_dir)
            .map_err(|e| LaunchgridError::io_with_path(e, &self.backups_dir))?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let file_name = format!("{}{}.db", PathsConfig::BACKUP_FILE_PREFIX, stamp);
        let target = self.backups_dir.join(file_name);

        std::fs::copy(&self.db_path, &target)
            .map_err(|e| LaunchgridError::io_with_path(e, &target))?;
        info!("Backed up database to {:?}", target);

        if let Err(e) = self.prune() {
            // A failed prune never fails the backup itself.
            warn!("Failed to prune old backups: {}", e);
        }

        let mut last = self.last_backup.lock().map_err(|e| {
            LaunchgridError::Other(format!("Backup state lock poisoned: {}", e))
        })?;
        *last = Some(Instant::now());

        Ok(BackupOutcome::Created(target))
    }

    /// List backup files, newest first by name (the timestamp sorts
    /// lexicographically).
    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = Vec::new();
        let entries = std::fs::read_dir(&self.backups_dir)
            .map_err(|e| LaunchgridError::io_with_path(e, &self.backups_dir))?;
        for entry in entries {
            let entry = entry.map_err(|e| LaunchgridError::io_with_path(e, &self.backups_dir))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(PathsConfig::BACKUP_FILE_PREFIX) && name.ends_with(".db") {
                names.push(name);
            }
        }

        names.sort_unstable_by(|a, b| b.cmp(a));
        Ok(names
            .into_iter()
            .map(|n| self.backups_dir.join(n))
            .collect())
    }

    /// Delete all but the newest backups.
    fn prune(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for stale in backups.iter().skip(BackupConfig::RETENTION_COUNT) {
            std::fs::remove_file(stale)
                .map_err(|e| LaunchgridError::io_with_path(e, stale))?;
            debug!("Pruned old backup {:?}", stale);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BackupManager) {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("launcher.db");
        std::fs::write(&db_path, b"not really sqlite").unwrap();
        let manager = BackupManager::new(&db_path, temp.path().join("backups"));
        (temp, manager)
    }

    #[test]
    fn test_backup_creates_file() {
        let (_temp, manager) = setup();
        match manager.backup_now().unwrap() {
            BackupOutcome::Created(path) => {
                assert!(path.exists());
                let name = path.file_name().unwrap().to_string_lossy().into_owned();
                assert!(name.starts_with(PathsConfig::BACKUP_FILE_PREFIX));
                assert!(name.ends_with(".db"));
                assert_eq!(std::fs::read(&path).unwrap(), b"not really sqlite");
            }
            other => panic!("expected Created, got {:?}", other),
        }
    }

    #[test]
    fn test_immediate_second_backup_is_skipped() {
        let (_temp, manager) = setup();
        assert!(matches!(
            manager.backup_now().unwrap(),
            BackupOutcome::Created(_)
        ));
        assert_eq!(manager.backup_now().unwrap(), BackupOutcome::Skipped);
        assert_eq!(manager.list_backups().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_database_is_skipped() {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(
            temp.path().join("absent.db"),
            temp.path().join("backups"),
        );
        assert_eq!(manager.backup_now().unwrap(), BackupOutcome::Skipped);
        assert!(manager.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_prune_keeps_newest() {
        let (_temp, manager) = setup();
        std::fs::create_dir_all(manager.backups_dir()).unwrap();

        // Seed more files than the retention count, named oldest first.
        for i in 0..8 {
            let name = format!(
                "{}2024010{}_000000.db",
                PathsConfig::BACKUP_FILE_PREFIX,
                i + 1
            );
            std::fs::write(manager.backups_dir().join(name), b"x").unwrap();
        }

        manager.prune().unwrap();
        let left = manager.list_backups().unwrap();
        assert_eq!(left.len(), BackupConfig::RETENTION_COUNT);
        // Newest (highest timestamp) survived.
        let newest = left[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(newest.contains("20240108"));
    }

    #[test]
    fn test_list_ignores_foreign_files() {
        let (_temp, manager) = setup();
        std::fs::create_dir_all(manager.backups_dir()).unwrap();
        std::fs::write(manager.backups_dir().join("notes.txt"), b"x").unwrap();
        std::fs::write(
            manager
                .backups_dir()
                .join(format!("{}20240101_000000.db", PathsConfig::BACKUP_FILE_PREFIX)),
            b"x",
        )
        .unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 1);
    }
}
