use datasight_gantt::model::TaskKind;
use egui::{Color32, Context, RichText, Window};

use crate::app::GanttApp;
use crate::ui::theme;

const DIALOG_WIDTH: f32 = 340.0;

/// Render the "Add Task" dialog.
pub fn show_add_task_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    let parents: Vec<(u32, String)> = app
        .project
        .tasks
        .iter()
        .filter(|t| t.is_group())
        .map(|t| (t.id, t.name.clone()))
        .collect();

    Window::new(RichText::new("Add Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            let form = &mut app.new_task;
            ui.add_space(4.0);

            egui::Grid::new("add_task_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut form.name).hint_text("Task name..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Type").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("dlg_kind")
                        .selected_text(form.kind.label())
                        .show_ui(ui, |ui| {
                            for kind in [TaskKind::Task, TaskKind::Milestone, TaskKind::Group] {
                                ui.selectable_value(&mut form.kind, kind, kind.label());
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut form.start).id_salt("dlg_dp_start"));
                    ui.end_row();

                    if form.kind != TaskKind::Milestone {
                        ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                        ui.add(egui_extras::DatePickerButton::new(&mut form.end).id_salt("dlg_dp_end"));
                        ui.end_row();
                    }

                    ui.label(RichText::new("Depends on").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut form.dependencies).hint_text("e.g. 2, 5"),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Parent").color(theme::TEXT_SECONDARY));
                    let selected = form
                        .parent
                        .and_then(|id| parents.iter().find(|(pid, _)| *pid == id))
                        .map_or_else(|| "(none)".to_string(), |(_, name)| name.clone());
                    egui::ComboBox::from_id_salt("dlg_parent")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut form.parent, None, "(none)");
                            for (id, name) in &parents {
                                ui.selectable_value(&mut form.parent, Some(*id), name);
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Assignee").color(theme::TEXT_SECONDARY));
                    ui.add_sized([220.0, 24.0], egui::TextEdit::singleline(&mut form.assignee));
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], create_btn).clicked() {
                    should_close = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    app.show_add_task = false;
                }
            });
            ui.add_space(2.0);
        });

    // Only close if the task was accepted; validation errors keep the form open.
    if should_close && app.create_task_from_dialog() {
        app.show_add_task = false;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_task = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("DataSight Gantt").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Timeline, hierarchy and critical path");
                ui.label("for DataSight project plans.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

/// Render the "CSV Format" help dialog.
pub fn show_csv_help_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([560.0, 440.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);
                ui.label(RichText::new("Delimiters").strong());
                ui.label("Auto-detected: semicolon (;), comma (,) or tab. Export uses semicolons.");
                ui.add_space(8.0);

                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for (column, headers) in [
                            ("ID", "ID, Task ID, # (optional, assigned when missing)"),
                            ("Name *", "Name, Task, Task Name, Label, Title, Activity"),
                            ("Start *", "Start, Start Date, From, Begin"),
                            ("End *", "End, End Date, To, Finish, Due"),
                            ("Type", "Type, Kind, Milestone: task / milestone / group"),
                            ("Progress", "Progress, Status, Done: 0-100, 40%, 0.4, done"),
                            ("Dependencies", "Dependencies, Depends On, Predecessors: ids"),
                            ("Parent", "Parent, Parent ID, Parent Task: id or name"),
                            ("Assignee", "Assignee, Owner, Assigned To, Resource"),
                        ] {
                            ui.label(RichText::new(column).strong());
                            ui.label(headers);
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                ui.label(RichText::new("Date Formats").strong());
                for fmt in [
                    "YYYY-MM-DD", "DD/MM/YYYY", "MM/DD/YYYY", "DD-MM-YYYY", "DD.MM.YYYY",
                    "YYYY/MM/DD",
                ] {
                    ui.label(RichText::new(fmt).monospace().size(11.0));
                }
                ui.add_space(8.0);
                ui.label(
                    RichText::new("Rows without a name or valid dates are skipped.").small(),
                );
            });

            ui.separator();
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_csv_help = false;
    }
}
