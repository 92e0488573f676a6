//! Application state and the action dispatch loop.
//!
//! The UI never mutates the store directly: widgets emit [`Action`]s, which
//! are applied after drawing, and every mutation reloads the cached rows from
//! the store. The store is the single source of truth; this struct holds only
//! transient copies.

mod dialogs;
mod ui;

use dialogs::Dialog;
use launchgrid_core::config::{BackupConfig, UiConfig};
use launchgrid_core::{
    icon, BackupOutcome, Button, ButtonSpec, Group, Launchgrid, Settings,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// A state change requested by a widget during drawing.
pub enum Action {
    SelectGroup(i64),
    LaunchButton(i64),
    ToggleSelection(i64),
    SetGroupFavorite(i64, bool),
    SetButtonFavorite(i64, bool),
    CreateGroup { name: String },
    RenameGroup { id: i64, name: String },
    DeleteGroup(i64),
    SaveButton {
        id: Option<i64>,
        group_id: i64,
        spec: ButtonSpec,
    },
    DeleteButtons(Vec<i64>),
    MoveButtons { ids: Vec<i64>, target: i64 },
    /// Swap a group with its display neighbor (-1 left, +1 right).
    ShiftGroup(i64, i64),
    /// Swap a button with its display neighbor within the current group.
    ShiftButton(i64, i64),
    OpenDialog(Dialog),
    CloseDialog,
    ToggleBatchMode,
}

pub struct LauncherApp {
    engine: Launchgrid,
    settings: Settings,

    // Cached store rows, refreshed after every mutation.
    groups: Vec<Group>,
    buttons: Vec<Button>,
    all_buttons: Vec<Button>,
    selected_group: Option<i64>,

    search_query: String,
    batch_mode: bool,
    selection: HashSet<i64>,
    dialog: Option<Dialog>,
    pending: Vec<Action>,

    status: Option<(String, Instant)>,
    last_backup_tick: Instant,
    // None marks a button whose icon resolution already failed.
    icon_textures: HashMap<i64, Option<egui::TextureHandle>>,
}

impl LauncherApp {
    pub fn new(engine: Launchgrid, settings: Settings) -> Self {
        let mut app = Self {
            engine,
            settings,
            groups: Vec::new(),
            buttons: Vec::new(),
            all_buttons: Vec::new(),
            selected_group: None,
            search_query: String::new(),
            batch_mode: false,
            selection: HashSet::new(),
            dialog: None,
            pending: Vec::new(),
            status: None,
            last_backup_tick: Instant::now(),
            icon_textures: HashMap::new(),
        };
        app.reload();
        app
    }

    /// Refresh every cached row from the store.
    fn reload(&mut self) {
        self.groups = self.engine.store().get_groups();
        self.all_buttons = self.engine.store().get_all_buttons();

        let still_there = self
            .selected_group
            .filter(|id| self.groups.iter().any(|g| g.id == *id));
        self.selected_group = still_there.or_else(|| self.groups.first().map(|g| g.id));

        self.buttons = match self.selected_group {
            Some(gid) => self.engine.store().get_buttons(gid),
            None => Vec::new(),
        };
        self.selection
            .retain(|id| self.buttons.iter().any(|b| b.id == *id));
        self.icon_textures.clear();
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    fn current_status(&mut self) -> Option<&str> {
        if matches!(&self.status, Some((_, at)) if at.elapsed() > UiConfig::STATUS_TTL) {
            self.status = None;
        }
        match &self.status {
            Some((message, _)) => Some(message),
            None => None,
        }
    }

    fn button_by_id(&self, id: i64) -> Option<&Button> {
        self.all_buttons.iter().find(|b| b.id == id)
    }

    /// Resolve (and lazily upload) a button's icon texture.
    fn icon_texture(&mut self, ctx: &egui::Context, button: &Button) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.icon_textures.get(&button.id) {
            return cached.clone();
        }

        let texture = self
            .engine
            .icons()
            .resolve(&button.name, Path::new(&button.path), button.icon_path())
            .and_then(|cache_path| match icon::load_cached(&cache_path) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!("Unreadable icon cache for '{}': {}", button.name, e);
                    None
                }
            })
            .map(|image| {
                let color = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width as usize, image.height as usize],
                    &image.rgba,
                );
                ctx.load_texture(
                    format!("icon-{}", button.id),
                    color,
                    egui::TextureOptions::LINEAR,
                )
            });

        self.icon_textures.insert(button.id, texture.clone());
        texture
    }

    /// Apply all actions queued during this frame.
    fn apply_pending(&mut self) {
        let actions: Vec<Action> = self.pending.drain(..).collect();
        for action in actions {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::SelectGroup(id) => {
                self.selected_group = Some(id);
                self.selection.clear();
                self.reload();
            }
            Action::LaunchButton(id) => {
                if let Some(button) = self.button_by_id(id).cloned() {
                    match self.engine.launch_button(&button) {
                        Ok(()) => self.set_status(format!("Launched {}", button.name)),
                        Err(e) => self.set_status(e.to_string()),
                    }
                }
            }
            Action::ToggleSelection(id) => {
                if !self.selection.remove(&id) {
                    self.selection.insert(id);
                }
            }
            Action::SetGroupFavorite(id, fav) => {
                self.write(|engine| engine.store().set_group_favorite(id, fav));
            }
            Action::SetButtonFavorite(id, fav) => {
                self.write(|engine| engine.store().set_button_favorite(id, fav));
            }
            Action::CreateGroup { name } => {
                match self.engine.store().add_group(&name, false) {
                    Ok(id) => {
                        self.dialog = None;
                        self.selected_group = Some(id);
                        self.reload();
                    }
                    Err(e) => self.dialog_error(e.to_string()),
                }
            }
            Action::RenameGroup { id, name } => {
                match self.engine.store().rename_group(id, &name) {
                    Ok(()) => {
                        self.dialog = None;
                        self.reload();
                    }
                    Err(e) => self.dialog_error(e.to_string()),
                }
            }
            Action::DeleteGroup(id) => {
                self.dialog = None;
                self.write(|engine| engine.store().delete_group(id));
            }
            Action::SaveButton { id, group_id, spec } => {
                let result = match id {
                    Some(id) => self.engine.store().update_button(id, &spec),
                    None => self.engine.store().add_button(group_id, &spec).map(|_| ()),
                };
                match result {
                    Ok(()) => {
                        // The target may have changed; recompute its icon.
                        self.engine.icons().invalidate(Path::new(&spec.path));
                        self.dialog = None;
                        self.reload();
                    }
                    Err(e) => self.dialog_error(e.to_string()),
                }
            }
            Action::DeleteButtons(ids) => {
                self.dialog = None;
                let count = ids.len();
                self.write(|engine| engine.store().delete_buttons(&ids));
                self.selection.clear();
                self.set_status(format!("Deleted {} shortcut(s)", count));
            }
            Action::MoveButtons { ids, target } => {
                self.dialog = None;
                self.write(|engine| engine.store().move_buttons_to_group(&ids, target));
                self.selection.clear();
            }
            Action::ShiftGroup(id, delta) => {
                let ids: Vec<i64> = self.groups.iter().map(|g| g.id).collect();
                if let Some(order) = shifted_order(&ids, id, delta) {
                    self.write(|engine| engine.store().reorder_groups(&order));
                }
            }
            Action::ShiftButton(id, delta) => {
                let ids: Vec<i64> = self.buttons.iter().map(|b| b.id).collect();
                if let Some(order) = shifted_order(&ids, id, delta) {
                    self.write(|engine| engine.store().reorder_buttons(&order));
                }
            }
            Action::OpenDialog(dialog) => self.dialog = Some(dialog),
            Action::CloseDialog => self.dialog = None,
            Action::ToggleBatchMode => {
                self.batch_mode = !self.batch_mode;
                self.selection.clear();
            }
        }
    }

    /// Run a store write, surfacing failures in the status line, then reload.
    fn write(
        &mut self,
        op: impl FnOnce(&Launchgrid) -> launchgrid_core::Result<()>,
    ) {
        if let Err(e) = op(&self.engine) {
            warn!("Store write failed: {}", e);
            self.set_status(e.to_string());
        }
        self.reload();
    }

    /// Route an error back into the open dialog, or the status line.
    fn dialog_error(&mut self, message: String) {
        match &mut self.dialog {
            Some(dialog) => dialog.set_error(message),
            None => self.set_status(message),
        }
    }

    fn backup_tick(&mut self) {
        if self.last_backup_tick.elapsed() < BackupConfig::INTERVAL {
            return;
        }
        self.last_backup_tick = Instant::now();
        match self.engine.backup_now() {
            Ok(BackupOutcome::Created(path)) => info!("Hourly backup written to {:?}", path),
            Ok(BackupOutcome::Skipped) => {}
            Err(e) => warn!("Hourly backup failed: {}", e),
        }
    }
}

/// The display order with one id swapped toward its neighbor, or `None` when
/// the move would fall off either end.
fn shifted_order(ids: &[i64], id: i64, delta: i64) -> Option<Vec<i64>> {
    let index = ids.iter().position(|candidate| *candidate == id)? as i64;
    let neighbor = index + delta;
    if neighbor < 0 || neighbor >= ids.len() as i64 {
        return None;
    }
    let mut order = ids.to_vec();
    order.swap(index as usize, neighbor as usize);
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::shifted_order;

    #[test]
    fn test_shifted_order() {
        let ids = [10, 20, 30];
        assert_eq!(shifted_order(&ids, 20, -1), Some(vec![20, 10, 30]));
        assert_eq!(shifted_order(&ids, 20, 1), Some(vec![10, 30, 20]));
        // Moves off either end are rejected.
        assert_eq!(shifted_order(&ids, 10, -1), None);
        assert_eq!(shifted_order(&ids, 30, 1), None);
        assert_eq!(shifted_order(&ids, 99, 1), None);
    }
}

impl eframe::App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.backup_tick();

        let size = ctx.screen_rect().size();
        self.settings.window_width = size.x;
        self.settings.window_height = size.y;

        ui::draw(self, ctx);
        dialogs::draw(self, ctx);
        self.apply_pending();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.settings.backup_on_exit {
            match self.engine.backup_now() {
                Ok(BackupOutcome::Created(path)) => info!("Exit backup written to {:?}", path),
                Ok(BackupOutcome::Skipped) => {}
                Err(e) => warn!("Exit backup failed: {}", e),
            }
        }
        if let Err(e) = self.engine.save_settings(&self.settings) {
            warn!("Failed to save settings: {}", e);
        }
    }
}
