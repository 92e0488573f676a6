//! Modal dialogs: group/shortcut editors, confirmations, move picker.

use super::{Action, LauncherApp};
use launchgrid_core::ButtonSpec;

/// The one dialog that may be open at a time.
pub enum Dialog {
    GroupEditor {
        /// `None` creates, `Some` renames.
        id: Option<i64>,
        name: String,
        error: Option<String>,
    },
    ConfirmDeleteGroup {
        id: i64,
        name: String,
    },
    ButtonEditor {
        /// `None` creates, `Some` edits.
        id: Option<i64>,
        group_id: i64,
        spec: ButtonSpec,
        error: Option<String>,
    },
    ConfirmDeleteButtons {
        ids: Vec<i64>,
    },
    MoveButtons {
        ids: Vec<i64>,
        target: Option<i64>,
    },
}

impl Dialog {
    pub fn add_group() -> Self {
        Dialog::GroupEditor {
            id: None,
            name: String::new(),
            error: None,
        }
    }

    pub fn rename_group(id: i64, name: String) -> Self {
        Dialog::GroupEditor {
            id: Some(id),
            name,
            error: None,
        }
    }

    pub fn confirm_delete_group(id: i64, name: String) -> Self {
        Dialog::ConfirmDeleteGroup { id, name }
    }

    pub fn add_button(group_id: i64) -> Self {
        Dialog::ButtonEditor {
            id: None,
            group_id,
            spec: ButtonSpec::default(),
            error: None,
        }
    }

    pub fn edit_button(id: i64, group_id: i64, spec: ButtonSpec) -> Self {
        Dialog::ButtonEditor {
            id: Some(id),
            group_id,
            spec,
            error: None,
        }
    }

    pub fn confirm_delete_buttons(ids: Vec<i64>) -> Self {
        Dialog::ConfirmDeleteButtons { ids }
    }

    pub fn move_buttons(ids: Vec<i64>) -> Self {
        Dialog::MoveButtons { ids, target: None }
    }

    /// Attach a store error so the open editor can show it inline.
    pub fn set_error(&mut self, message: String) {
        match self {
            Dialog::GroupEditor { error, .. } | Dialog::ButtonEditor { error, .. } => {
                *error = Some(message);
            }
            _ => {}
        }
    }
}

pub(super) fn draw(app: &mut LauncherApp, ctx: &egui::Context) {
    let Some(mut dialog) = app.dialog.take() else {
        return;
    };

    match &mut dialog {
        Dialog::GroupEditor { id, name, error } => {
            let title = if id.is_some() { "Rename group" } else { "New group" };
            centered_window(ctx, title, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Name:");
                    ui.text_edit_singleline(name);
                });
                if let Some(message) = error {
                    ui.colored_label(egui::Color32::RED, message.as_str());
                }
                ui.separator();
                ui.horizontal(|ui| {
                    let valid = !name.trim().is_empty();
                    if ui.add_enabled(valid, egui::Button::new("Save")).clicked() {
                        app.pending.push(match id {
                            Some(id) => Action::RenameGroup {
                                id: *id,
                                name: name.clone(),
                            },
                            None => Action::CreateGroup { name: name.clone() },
                        });
                    }
                    if ui.button("Cancel").clicked() {
                        app.pending.push(Action::CloseDialog);
                    }
                });
            });
        }

        Dialog::ConfirmDeleteGroup { id, name } => {
            centered_window(ctx, "Delete group", |ui| {
                ui.label(format!(
                    "Delete group '{}' and every shortcut in it?",
                    name
                ));
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        app.pending.push(Action::DeleteGroup(*id));
                    }
                    if ui.button("Cancel").clicked() {
                        app.pending.push(Action::CloseDialog);
                    }
                });
            });
        }

        Dialog::ButtonEditor {
            id,
            group_id,
            spec,
            error,
        } => {
            let title = if id.is_some() { "Edit shortcut" } else { "New shortcut" };
            centered_window(ctx, title, |ui| {
                egui::Grid::new("button_editor")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Name:");
                        ui.text_edit_singleline(&mut spec.name);
                        ui.end_row();

                        ui.label("Target path:");
                        ui.text_edit_singleline(&mut spec.path);
                        ui.end_row();

                        ui.label("Arguments:");
                        ui.text_edit_singleline(&mut spec.arguments);
                        ui.end_row();

                        ui.label("Working dir:");
                        ui.text_edit_singleline(&mut spec.working_dir);
                        ui.end_row();

                        ui.label("Icon file:");
                        ui.text_edit_singleline(&mut spec.icon_path);
                        ui.end_row();

                        ui.label("");
                        ui.checkbox(&mut spec.run_as_admin, "Run elevated");
                        ui.end_row();
                    });

                if let Some(message) = error {
                    ui.colored_label(egui::Color32::RED, message.as_str());
                }
                ui.separator();
                ui.horizontal(|ui| {
                    let valid = !spec.name.trim().is_empty() && !spec.path.trim().is_empty();
                    if ui.add_enabled(valid, egui::Button::new("Save")).clicked() {
                        app.pending.push(Action::SaveButton {
                            id: *id,
                            group_id: *group_id,
                            spec: spec.clone(),
                        });
                    }
                    if ui.button("Cancel").clicked() {
                        app.pending.push(Action::CloseDialog);
                    }
                });
            });
        }

        Dialog::ConfirmDeleteButtons { ids } => {
            centered_window(ctx, "Delete shortcuts", |ui| {
                ui.label(format!("Delete {} shortcut(s)?", ids.len()));
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        app.pending.push(Action::DeleteButtons(ids.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        app.pending.push(Action::CloseDialog);
                    }
                });
            });
        }

        Dialog::MoveButtons { ids, target } => {
            let groups = app.groups.clone();
            centered_window(ctx, "Move to group", |ui| {
                for group in &groups {
                    ui.radio_value(target, Some(group.id), &group.name);
                }
                ui.separator();
                ui.horizontal(|ui| {
                    let valid = target.is_some();
                    if ui.add_enabled(valid, egui::Button::new("Move")).clicked() {
                        if let Some(target) = *target {
                            app.pending.push(Action::MoveButtons {
                                ids: ids.clone(),
                                target,
                            });
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        app.pending.push(Action::CloseDialog);
                    }
                });
            });
        }
    }

    app.dialog = Some(dialog);
}

fn centered_window(ctx: &egui::Context, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, add_contents);
}
