use std::collections::BTreeSet;

use datasight_gantt::graph::DisplayRow;
use datasight_gantt::model::TaskId;
use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::ui::theme;

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(TaskId),
    Delete(TaskId),
    Add,
}

/// Render the left-side task table panel in display order.
pub fn show_task_table(
    rows: &[DisplayRow<'_>],
    critical: &BTreeSet<TaskId>,
    selected_task: Option<TaskId>,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Tasks")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", rows.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
        if !critical.is_empty() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{} critical", critical.len()))
                        .size(11.0)
                        .color(theme::CRITICAL),
                );
            });
        }
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Task", icons::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = TaskTableAction::Add;
    }

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, row) in rows.iter().enumerate() {
                let task = row.task;
                let is_selected = selected_task == Some(task.id);
                let is_critical = critical.contains(&task.id);

                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let frame = egui::Frame {
                    fill: row_bg,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 4.0),
                    outer_margin: egui::Margin::ZERO,
                    stroke: egui::Stroke::NONE,
                    shadow: egui::epaint::Shadow::NONE,
                };

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;
                        ui.add_space(row.level as f32 * theme::INDENT);

                        let dot_color = if is_critical {
                            theme::CRITICAL
                        } else {
                            theme::task_color(task.id)
                        };
                        let (dot_rect, _) =
                            ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot_rect.center(), 3.0, dot_color);

                        let name = if task.is_milestone() {
                            format!("◆ {}", task.name)
                        } else {
                            task.name.clone()
                        };
                        let mut name_text = RichText::new(name).size(12.0).color(if is_selected {
                            Color32::WHITE
                        } else if task.is_group() {
                            theme::GROUP_TEXT
                        } else {
                            theme::TEXT_PRIMARY
                        });
                        if task.is_group() {
                            name_text = name_text.strong();
                        }
                        ui.add(egui::Label::new(name_text).truncate());

                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                ui.spacing_mut().item_spacing.x = 4.0;

                                let del_btn = ui.add(
                                    egui::Button::new(
                                        RichText::new(icons::X).size(11.0).color(theme::TEXT_DIM),
                                    )
                                    .frame(false),
                                );
                                if del_btn.on_hover_text("Delete task").clicked() {
                                    action = TaskTableAction::Delete(task.id);
                                }

                                if !task.is_group() {
                                    let pbar =
                                        egui::ProgressBar::new(f32::from(task.progress) / 100.0)
                                            .desired_width(40.0)
                                            .fill(theme::task_color(task.id))
                                            .rounding(egui::Rounding::same(3.0));
                                    ui.add(pbar);
                                }

                                if let Some(assignee) = &task.assignee {
                                    ui.label(
                                        RichText::new(assignee)
                                            .size(10.0)
                                            .color(theme::TEXT_DIM),
                                    );
                                }

                                ui.label(
                                    RichText::new(task.end.format("%m/%d").to_string())
                                        .size(10.0)
                                        .color(theme::TEXT_SECONDARY),
                                );
                                if !task.is_milestone() {
                                    ui.label(RichText::new("→").size(9.0).color(theme::TEXT_DIM));
                                    ui.label(
                                        RichText::new(task.start.format("%m/%d").to_string())
                                            .size(10.0)
                                            .color(theme::TEXT_SECONDARY),
                                    );
                                }
                            },
                        );
                    });
                });

                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("task-row", task.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    action = TaskTableAction::Select(task.id);
                }

                ui.add_space(1.0);
            }
        });

    action
}
