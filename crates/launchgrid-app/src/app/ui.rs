//! Main window layout: toolbar, tab strip, tile grid, status bar.

use super::{Action, LauncherApp};
use crate::app::dialogs::Dialog;
use launchgrid_core::config::UiConfig;
use launchgrid_core::{search, Button, ButtonSpec, HitKind};

pub(super) fn draw(app: &mut LauncherApp, ctx: &egui::Context) {
    draw_toolbar(app, ctx);
    draw_status_bar(app, ctx);

    egui::CentralPanel::default().show(ctx, |ui| {
        if !app.search_query.trim().is_empty() {
            draw_search_results(app, ui);
            return;
        }

        draw_tab_strip(app, ui);
        ui.separator();

        if app.batch_mode {
            draw_batch_toolbar(app, ui);
            ui.separator();
        }

        draw_tiles(app, ui);
    });
}

fn draw_toolbar(app: &mut LauncherApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label("🔍");
            let search = egui::TextEdit::singleline(&mut app.search_query)
                .hint_text("Search shortcuts and groups")
                .desired_width(220.0);
            ui.add(search);
            if !app.search_query.is_empty() && ui.small_button("✖").clicked() {
                app.search_query.clear();
            }

            ui.separator();

            if ui.button("＋ Group").clicked() {
                app.pending
                    .push(Action::OpenDialog(Dialog::add_group()));
            }
            let can_add_button = app.selected_group.is_some();
            if ui
                .add_enabled(can_add_button, egui::Button::new("＋ Shortcut"))
                .clicked()
            {
                if let Some(gid) = app.selected_group {
                    app.pending
                        .push(Action::OpenDialog(Dialog::add_button(gid)));
                }
            }

            ui.separator();

            let batch_label = if app.batch_mode {
                "Done selecting"
            } else {
                "Select…"
            };
            if ui.selectable_label(app.batch_mode, batch_label).clicked() {
                app.pending.push(Action::ToggleBatchMode);
            }
        });
    });
}

fn draw_search_results(app: &mut LauncherApp, ui: &mut egui::Ui) {
    let hits = search(&app.groups, &app.all_buttons, &app.search_query);
    if hits.is_empty() {
        ui.label("No matches.");
        return;
    }

    egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
        for hit in hits {
            let label = match hit.kind {
                HitKind::Group => format!("📁 {}", hit.name),
                HitKind::Button => format!("▶ {}  ({})", hit.name, hit.detail),
            };
            if ui.selectable_label(false, label).clicked() {
                match hit.kind {
                    // Jump to the owning group; launch buttons directly.
                    HitKind::Group => {}
                    HitKind::Button => app.pending.push(Action::LaunchButton(hit.id)),
                }
                app.pending.push(Action::SelectGroup(hit.group_id));
                app.search_query.clear();
            }
        }
    });
}

fn draw_tab_strip(app: &mut LauncherApp, ui: &mut egui::Ui) {
    let groups = app.groups.clone();
    ui.horizontal_wrapped(|ui| {
        for group in &groups {
            let selected = app.selected_group == Some(group.id);
            let label = if group.is_favorite {
                format!("★ {}", group.name)
            } else {
                group.name.clone()
            };

            let response = ui.selectable_label(selected, label);
            if response.clicked() {
                app.pending.push(Action::SelectGroup(group.id));
            }
            response.context_menu(|ui| {
                if ui.button("Rename…").clicked() {
                    app.pending.push(Action::OpenDialog(Dialog::rename_group(
                        group.id,
                        group.name.clone(),
                    )));
                    ui.close_menu();
                }
                let fav_label = if group.is_favorite {
                    "Unpin favorite"
                } else {
                    "Pin as favorite"
                };
                if ui.button(fav_label).clicked() {
                    app.pending
                        .push(Action::SetGroupFavorite(group.id, !group.is_favorite));
                    ui.close_menu();
                }
                if ui.button("Move left").clicked() {
                    app.pending.push(Action::ShiftGroup(group.id, -1));
                    ui.close_menu();
                }
                if ui.button("Move right").clicked() {
                    app.pending.push(Action::ShiftGroup(group.id, 1));
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Delete…").clicked() {
                    app.pending.push(Action::OpenDialog(Dialog::confirm_delete_group(
                        group.id,
                        group.name.clone(),
                    )));
                    ui.close_menu();
                }
            });
        }
    });
}

fn draw_batch_toolbar(app: &mut LauncherApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label(format!("{} selected", app.selection.len()));
        let any = !app.selection.is_empty();
        let ids: Vec<i64> = app.selection.iter().copied().collect();

        if ui.add_enabled(any, egui::Button::new("Move to…")).clicked() {
            app.pending
                .push(Action::OpenDialog(Dialog::move_buttons(ids.clone())));
        }
        if ui.add_enabled(any, egui::Button::new("Delete…")).clicked() {
            app.pending
                .push(Action::OpenDialog(Dialog::confirm_delete_buttons(ids)));
        }
    });
}

fn draw_tiles(app: &mut LauncherApp, ui: &mut egui::Ui) {
    let buttons = app.buttons.clone();
    if buttons.is_empty() {
        ui.label("No shortcuts in this group yet.");
        return;
    }

    egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for button in &buttons {
                draw_tile(app, ui, button);
            }
        });
    });
}

fn draw_tile(app: &mut LauncherApp, ui: &mut egui::Ui, button: &Button) {
    let texture = app.icon_texture(ui.ctx(), button);

    let mut title = String::new();
    if button.is_favorite {
        title.push_str("★ ");
    }
    title.push_str(&button.name);
    if button.run_as_admin {
        title.push_str(" 🛡");
    }

    let tile_size = egui::vec2(UiConfig::TILE_WIDTH, UiConfig::TILE_HEIGHT);
    let icon_size = egui::vec2(UiConfig::TILE_ICON_SIDE, UiConfig::TILE_ICON_SIDE);
    let selected = app.selection.contains(&button.id);

    let mut widget = match &texture {
        Some(tex) => egui::Button::image_and_text(
            egui::Image::new(tex).fit_to_exact_size(icon_size),
            title,
        ),
        None => egui::Button::new(title),
    }
    .min_size(tile_size)
    .wrap();
    if selected {
        widget = widget.fill(ui.visuals().selection.bg_fill);
    }

    let response = ui.add(widget).on_hover_text(&button.path);

    if response.clicked() {
        if app.batch_mode {
            app.pending.push(Action::ToggleSelection(button.id));
        } else {
            app.pending.push(Action::LaunchButton(button.id));
        }
    }

    response.context_menu(|ui| {
        if ui.button("Edit…").clicked() {
            app.pending.push(Action::OpenDialog(Dialog::edit_button(
                button.id,
                button.group_id,
                ButtonSpec::from_button(button),
            )));
            ui.close_menu();
        }
        let fav_label = if button.is_favorite {
            "Unpin favorite"
        } else {
            "Pin as favorite"
        };
        if ui.button(fav_label).clicked() {
            app.pending
                .push(Action::SetButtonFavorite(button.id, !button.is_favorite));
            ui.close_menu();
        }
        if ui.button("Move earlier").clicked() {
            app.pending.push(Action::ShiftButton(button.id, -1));
            ui.close_menu();
        }
        if ui.button("Move later").clicked() {
            app.pending.push(Action::ShiftButton(button.id, 1));
            ui.close_menu();
        }
        if ui.button("Move to…").clicked() {
            app.pending
                .push(Action::OpenDialog(Dialog::move_buttons(vec![button.id])));
            ui.close_menu();
        }
        ui.separator();
        if ui.button("Delete…").clicked() {
            app.pending.push(Action::OpenDialog(
                Dialog::confirm_delete_buttons(vec![button.id]),
            ));
            ui.close_menu();
        }
    });
}

fn draw_status_bar(app: &mut LauncherApp, ctx: &egui::Context) {
    let status = app.current_status().map(str::to_owned);
    let group_count = app.groups.len();
    let button_count = app.all_buttons.len();

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("{} groups · {} shortcuts", group_count, button_count));
            if let Some(message) = status {
                ui.separator();
                ui.label(message);
            }
        });
    });
}
