//! Row types for the shortcut store.
//!
//! These mirror the database schema directly. `working_dir` and `icon_path`
//! use the empty string for "unset", matching the stored column defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named tab holding an ordered collection of buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    /// Sort key within the tab strip; favorites always sort first.
    pub position: i64,
    pub is_favorite: bool,
}

/// A single launchable shortcut tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    /// Filesystem target: an executable file or a directory to open.
    pub path: String,
    /// Free-text arguments appended to the invocation.
    pub arguments: String,
    /// Empty string means "derive from the target's parent directory".
    pub working_dir: String,
    pub run_as_admin: bool,
    /// Cached icon image file, empty when unresolved.
    pub icon_path: String,
    pub position: i64,
    pub is_favorite: bool,
}

impl Button {
    /// The explicit working directory, if one is set.
    pub fn working_dir(&self) -> Option<&Path> {
        if self.working_dir.is_empty() {
            None
        } else {
            Some(Path::new(&self.working_dir))
        }
    }

    /// The cached icon path, if one was resolved.
    pub fn icon_path(&self) -> Option<&Path> {
        if self.icon_path.is_empty() {
            None
        } else {
            Some(Path::new(&self.icon_path))
        }
    }
}

/// Editable fields of a button, used for both insert and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonSpec {
    pub name: String,
    pub path: String,
    pub arguments: String,
    pub working_dir: String,
    pub run_as_admin: bool,
    pub icon_path: String,
    pub is_favorite: bool,
}

impl ButtonSpec {
    /// Seed a spec from an existing row, for edit dialogs.
    pub fn from_button(button: &Button) -> Self {
        Self {
            name: button.name.clone(),
            path: button.path.clone(),
            arguments: button.arguments.clone(),
            working_dir: button.working_dir.clone(),
            run_as_admin: button.run_as_admin,
            icon_path: button.icon_path.clone(),
            is_favorite: button.is_favorite,
        }
    }
}
