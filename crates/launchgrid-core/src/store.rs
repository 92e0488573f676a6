//! SQLite-backed shortcut store.
//!
//! Holds the two tables behind the launcher: `groups` (tabs) and `buttons`
//! (tiles). All writes commit synchronously before returning. Reads sort
//! favorites first, then by position, and degrade to an empty result after a
//! few retries so the UI can always render something.

use crate::config::{AppConfig, StoreConfig};
use crate::error::{LaunchgridError, Result};
use crate::models::{Button, ButtonSpec, Group};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Columns added after the first release. Applied additively at open;
/// "duplicate column name" from an already-migrated database is a no-op.
const ADDITIVE_COLUMNS: &[(&str, &str, &str)] = &[
    ("groups", "is_favorite", "INTEGER DEFAULT 0"),
    ("buttons", "arguments", "TEXT DEFAULT ''"),
    ("buttons", "working_dir", "TEXT DEFAULT ''"),
    ("buttons", "run_as_admin", "INTEGER DEFAULT 0"),
    ("buttons", "icon_path", "TEXT DEFAULT ''"),
    ("buttons", "is_favorite", "INTEGER DEFAULT 0"),
];

/// SQLite-backed store for groups and buttons.
///
/// Thread-safe via an internal mutex on the single connection; the
/// application is single-writer by construction.
pub struct ShortcutStore {
    conn: Arc<Mutex<Connection>>,
}

impl ShortcutStore {
    /// Open (or create) the store at the given database path.
    ///
    /// An unreadable database file is quarantined next to the original path
    /// and a fresh one is created in its place; the launcher always comes up.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LaunchgridError::io_with_path(e, parent))?;
        }

        match Self::open_file(db_path) {
            Ok(store) => Ok(store),
            Err(e) if is_unreadable_database(&e) => {
                warn!("Database at {:?} is unreadable, rebuilding: {}", db_path, e);
                quarantine_database(db_path)?;
                Self::open_file(db_path)
            }
            Err(e) => Err(e),
        }
    }

    fn open_file(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(|e| LaunchgridError::Database {
            message: format!("Failed to open launcher database: {}", e),
            source: Some(e),
        })?;

        // Foreign keys are off by default in SQLite; cascade delete needs them.
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )
        .map_err(|e| LaunchgridError::Database {
            message: format!("Failed to set pragmas: {}", e),
            source: Some(e),
        })?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;

        Ok(store)
    }

    /// Open an in-memory store, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| LaunchgridError::Database {
            message: format!("Failed to lock database: {}", e),
            source: None,
        })
    }

    /// Initialize or additively migrate the schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS groups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                position INTEGER DEFAULT 0,
                is_favorite INTEGER DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS buttons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                group_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                path TEXT NOT NULL,
                arguments TEXT DEFAULT '',
                working_dir TEXT DEFAULT '',
                run_as_admin INTEGER DEFAULT 0,
                icon_path TEXT DEFAULT '',
                position INTEGER DEFAULT 0,
                is_favorite INTEGER DEFAULT 0,
                FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE
            );
            "#,
        )
        .map_err(|e| LaunchgridError::Database {
            message: format!("Failed to initialize schema: {}", e),
            source: Some(e),
        })?;

        // Versionless additive migration: try each later-added column and
        // ignore the error when it is already there.
        for (table, column, col_type) in ADDITIVE_COLUMNS {
            let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, col_type);
            if let Err(e) = conn.execute(&sql, []) {
                let msg = e.to_string();
                if msg.contains("duplicate column name") {
                    continue;
                }
                return Err(LaunchgridError::Database {
                    message: format!("Failed to add column {}.{}: {}", table, column, e),
                    source: Some(e),
                });
            }
            debug!("Added column {}.{}", table, column);
        }

        Ok(())
    }

    // ----- groups -----

    /// Add a group at the end of the tab order. Returns the new id.
    pub fn add_group(&self, name: &str, is_favorite: bool) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LaunchgridError::validation("name", "Group name must not be empty"));
        }

        let conn = self.lock()?;
        let max_pos: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position), 0) FROM groups",
            [],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO groups (name, position, is_favorite) VALUES (?1, ?2, ?3)",
            params![name, max_pos + 1, is_favorite],
        )
        .map_err(|e| LaunchgridError::Database {
            message: format!("Failed to add group '{}': {}", name, e),
            source: Some(e),
        })?;

        Ok(conn.last_insert_rowid())
    }

    /// All groups, favorites first, then by position.
    ///
    /// Degrades to an empty list after retries; never propagates read errors.
    pub fn get_groups(&self) -> Vec<Group> {
        self.read_degraded("groups", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, position, is_favorite FROM groups
                 ORDER BY is_favorite DESC, position ASC",
            )?;
            let rows = stmt
                .query_map([], group_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Rename a group. The new name must be non-empty and unique.
    pub fn rename_group(&self, group_id: i64, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(LaunchgridError::validation("name", "Group name must not be empty"));
        }

        let conn = self.lock()?;
        conn.execute(
            "UPDATE groups SET name = ?1 WHERE id = ?2",
            params![new_name, group_id],
        )?;
        Ok(())
    }

    /// Toggle the favorite flag. Stored position is left untouched; the
    /// favorites-first sort order is recomputed on the next read.
    pub fn set_group_favorite(&self, group_id: i64, is_favorite: bool) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE groups SET is_favorite = ?1 WHERE id = ?2",
            params![is_favorite, group_id],
        )?;
        Ok(())
    }

    /// Delete a group and, via cascade, every button it owns.
    pub fn delete_group(&self, group_id: i64) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM groups WHERE id = ?1", params![group_id])?;
        Ok(())
    }

    /// Create the default group if the store holds no groups at all.
    ///
    /// Returns the new group's id when one was created.
    pub fn ensure_default_group(&self) -> Result<Option<i64>> {
        let count: i64 = {
            let conn = self.lock()?;
            conn.query_row("SELECT COUNT(*) FROM groups", [], |row| row.get(0))?
        };
        if count > 0 {
            return Ok(None);
        }
        let id = self.add_group(AppConfig::DEFAULT_GROUP_NAME, false)?;
        debug!("Created default group (id {})", id);
        Ok(Some(id))
    }

    /// Rewrite group positions to 1..n in the supplied order.
    pub fn reorder_groups(&self, group_order: &[i64]) -> Result<()> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        for (index, group_id) in group_order.iter().enumerate() {
            tx.execute(
                "UPDATE groups SET position = ?1 WHERE id = ?2",
                params![index as i64 + 1, group_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ----- buttons -----

    /// Add a button at the end of a group. Returns the new id.
    pub fn add_button(&self, group_id: i64, spec: &ButtonSpec) -> Result<i64> {
        validate_button_spec(spec)?;

        let conn = self.lock()?;
        let max_pos: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position), 0) FROM buttons WHERE group_id = ?1",
            params![group_id],
            |row| row.get(0),
        )?;

        conn.execute(
            r#"
            INSERT INTO buttons
            (group_id, name, path, arguments, working_dir,
             run_as_admin, icon_path, position, is_favorite)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                group_id,
                spec.name.trim(),
                spec.path.trim(),
                spec.arguments,
                spec.working_dir,
                spec.run_as_admin,
                spec.icon_path,
                max_pos + 1,
                spec.is_favorite,
            ],
        )
        .map_err(|e| LaunchgridError::Database {
            message: format!("Failed to add button '{}': {}", spec.name, e),
            source: Some(e),
        })?;

        Ok(conn.last_insert_rowid())
    }

    /// Buttons of one group, favorites first, then by position.
    pub fn get_buttons(&self, group_id: i64) -> Vec<Button> {
        self.read_degraded("buttons", |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, group_id, name, path, arguments, working_dir,
                       run_as_admin, icon_path, position, is_favorite
                FROM buttons WHERE group_id = ?1
                ORDER BY is_favorite DESC, position ASC
                "#,
            )?;
            let rows = stmt
                .query_map(params![group_id], button_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// All buttons across groups, favorites first, then by position.
    pub fn get_all_buttons(&self) -> Vec<Button> {
        self.read_degraded("all buttons", |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, group_id, name, path, arguments, working_dir,
                       run_as_admin, icon_path, position, is_favorite
                FROM buttons
                ORDER BY is_favorite DESC, position ASC
                "#,
            )?;
            let rows = stmt
                .query_map([], button_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Update the editable fields of a button. Group, position, and favorite
    /// flag are managed by their own operations.
    pub fn update_button(&self, button_id: i64, spec: &ButtonSpec) -> Result<()> {
        validate_button_spec(spec)?;

        let conn = self.lock()?;
        conn.execute(
            r#"
            UPDATE buttons SET
                name = ?1, path = ?2, arguments = ?3,
                working_dir = ?4, run_as_admin = ?5, icon_path = ?6
            WHERE id = ?7
            "#,
            params![
                spec.name.trim(),
                spec.path.trim(),
                spec.arguments,
                spec.working_dir,
                spec.run_as_admin,
                spec.icon_path,
                button_id,
            ],
        )?;
        Ok(())
    }

    /// Toggle the favorite flag without touching the stored position.
    pub fn set_button_favorite(&self, button_id: i64, is_favorite: bool) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE buttons SET is_favorite = ?1 WHERE id = ?2",
            params![is_favorite, button_id],
        )?;
        Ok(())
    }

    /// Delete one button.
    pub fn delete_button(&self, button_id: i64) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM buttons WHERE id = ?1", params![button_id])?;
        Ok(())
    }

    /// Delete a batch of buttons in one transaction.
    pub fn delete_buttons(&self, button_ids: &[i64]) -> Result<()> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        for button_id in button_ids {
            tx.execute("DELETE FROM buttons WHERE id = ?1", params![button_id])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Reassign buttons to another group, appending after the target's
    /// current maximum position and preserving the supplied order.
    pub fn move_buttons_to_group(&self, button_ids: &[i64], target_group_id: i64) -> Result<()> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        let max_pos: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), 0) FROM buttons WHERE group_id = ?1",
            params![target_group_id],
            |row| row.get(0),
        )?;

        for (offset, button_id) in button_ids.iter().enumerate() {
            tx.execute(
                "UPDATE buttons SET group_id = ?1, position = ?2 WHERE id = ?3",
                params![target_group_id, max_pos + offset as i64 + 1, button_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Rewrite button positions to 1..n in the supplied order.
    pub fn reorder_buttons(&self, button_order: &[i64]) -> Result<()> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        for (index, button_id) in button_order.iter().enumerate() {
            tx.execute(
                "UPDATE buttons SET position = ?1 WHERE id = ?2",
                params![index as i64 + 1, button_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Flush the WAL into the main database file, so a file-level copy of
    /// the database sees every committed row.
    pub fn checkpoint(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }

    // ----- read degradation -----

    /// Run a read, retrying transient failures, then fall back to empty.
    fn read_degraded<T>(
        &self,
        what: &str,
        query: impl Fn(&Connection) -> rusqlite::Result<Vec<T>>,
    ) -> Vec<T> {
        for attempt in 0..=StoreConfig::READ_RETRY_ATTEMPTS {
            let result = match self.lock() {
                Ok(conn) => query(&conn),
                Err(e) => {
                    warn!("Failed to read {}: {}", what, e);
                    return Vec::new();
                }
            };
            match result {
                Ok(rows) => return rows,
                Err(e) if attempt < StoreConfig::READ_RETRY_ATTEMPTS => {
                    warn!(
                        "Failed to read {} (attempt {}): {}",
                        what,
                        attempt + 1,
                        e
                    );
                    std::thread::sleep(StoreConfig::READ_RETRY_DELAY);
                }
                Err(e) => {
                    warn!("Giving up reading {}, returning empty: {}", what, e);
                }
            }
        }
        Vec::new()
    }
}

/// SQLite codes that mean the file on disk is not a usable database.
fn is_unreadable_database(err: &LaunchgridError) -> bool {
    let LaunchgridError::Database {
        source: Some(rusqlite::Error::SqliteFailure(e, _)),
        ..
    } = err
    else {
        return false;
    };
    matches!(
        e.code,
        rusqlite::ErrorCode::NotADatabase | rusqlite::ErrorCode::DatabaseCorrupt
    )
}

/// Move an unreadable database out of the way, preserving it for inspection,
/// and drop its stale WAL siblings so the rebuilt file starts clean.
fn quarantine_database(db_path: &Path) -> Result<()> {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let quarantined = db_path.with_extension(format!("corrupt-{}.db", stamp));
    std::fs::rename(db_path, &quarantined)
        .map_err(|e| LaunchgridError::io_with_path(e, db_path))?;
    warn!("Quarantined unreadable database at {:?}", quarantined);

    for suffix in ["-wal", "-shm"] {
        let mut sidecar = db_path.as_os_str().to_owned();
        sidecar.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(sidecar));
    }
    Ok(())
}

fn validate_button_spec(spec: &ButtonSpec) -> Result<()> {
    if spec.name.trim().is_empty() {
        return Err(LaunchgridError::validation("name", "Button name must not be empty"));
    }
    if spec.path.trim().is_empty() {
        return Err(LaunchgridError::validation("path", "Button path must not be empty"));
    }
    Ok(())
}

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
        is_favorite: row.get(3)?,
    })
}

fn button_from_row(row: &Row<'_>) -> rusqlite::Result<Button> {
    Ok(Button {
        id: row.get(0)?,
        group_id: row.get(1)?,
        name: row.get(2)?,
        path: row.get(3)?,
        arguments: row.get(4)?,
        working_dir: row.get(5)?,
        run_as_admin: row.get(6)?,
        icon_path: row.get(7)?,
        position: row.get(8)?,
        is_favorite: row.get(9)?,
    })
}
