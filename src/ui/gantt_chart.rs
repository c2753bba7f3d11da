use chrono::{Duration, NaiveDate};
use datasight_gantt::model::{GanttFrame, Task, TaskId};
use datasight_gantt::timeline::{BarShape, TaskBar, TimelineAxis, TimelineViewport};
use egui::{Color32, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const ARROW_ELBOW: f32 = 8.0;
const ARROW_HEAD: f32 = 5.0;

#[derive(Debug, Clone)]
struct DragSnapshot {
    start: NaiveDate,
    end: NaiveDate,
    start_pointer_x: f32,
}

/// A bar dragged to new dates during this frame.
#[derive(Debug, Clone, Copy)]
pub struct TaskMove {
    pub task_id: TaskId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Result details from interactions in the Gantt chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    pub moved: Option<TaskMove>,
}

/// Render the Gantt chart area (right panel) from a precomputed frame.
pub fn show_gantt_chart(
    frame: &GanttFrame<'_>,
    viewport: &mut TimelineViewport,
    selected_task: &mut Option<TaskId>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let layout = &frame.layout;
    let available = ui.available_size();
    let chart_width = viewport.total_width(layout).max(available.x);
    let chart_height =
        HEADER_HEIGHT + (frame.rows.len() as f32 * (ROW_HEIGHT + ROW_PADDING)) + 40.0;

    // Handle zoom with scroll wheel
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            viewport.zoom_in();
        } else if scroll_delta.y < 0.0 {
            viewport.zoom_out();
        }
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            let Some(axis) = layout.axis else {
                painter.text(
                    response.rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No tasks yet. Add one or import a plan.",
                    theme::font_header(),
                    theme::TEXT_DIM,
                );
                return;
            };

            for i in 0..frame.rows.len() {
                let y = row_top(origin, i);
                let row_bg = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
                painter.rect_filled(
                    Rect::from_min_size(
                        Pos2::new(origin.x, y),
                        Vec2::new(chart_width, ROW_HEIGHT + ROW_PADDING),
                    ),
                    0.0,
                    row_bg,
                );
                painter.line_segment(
                    [
                        Pos2::new(origin.x, y + ROW_HEIGHT + ROW_PADDING),
                        Pos2::new(origin.x + chart_width, y + ROW_HEIGHT + ROW_PADDING),
                    ],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );
            }

            draw_timeline_header(&painter, origin, frame, viewport, &axis, chart_width, chart_height);
            draw_today_line(&painter, origin, frame, viewport, &axis, chart_height);
            draw_dependency_arrows(&painter, origin, frame, viewport);

            for bar in &layout.bars {
                let Some(row) = frame.rows.get(bar.row) else { continue };
                let task = row.task;
                let y = row_top(origin, bar.row) + ROW_PADDING;
                let is_selected = *selected_task == Some(task.id);
                let is_critical = frame.critical.contains(&task.id);

                let rect = match bar.shape {
                    BarShape::Bar => {
                        draw_task_bar(&painter, origin, viewport, task, bar, y, is_selected, is_critical)
                    }
                    BarShape::Diamond => {
                        draw_milestone(&painter, origin, viewport, task, bar, y, is_selected, is_critical)
                    }
                    BarShape::Hidden => {
                        draw_group_label(&painter, origin, viewport, task, bar, y);
                        continue;
                    }
                };

                let response = ui.interact(
                    rect.expand(2.0),
                    ui.make_persistent_id(("task-bar", task.id)),
                    Sense::click_and_drag(),
                );

                if response.clicked() || response.drag_started() {
                    *selected_task = Some(task.id);
                    consumed_click = true;
                }

                if response.drag_started() {
                    let ptr_x = response.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
                    ui.ctx().data_mut(|data| {
                        data.insert_temp(
                            drag_id(task.id),
                            DragSnapshot {
                                start: task.start,
                                end: task.end,
                                start_pointer_x: ptr_x,
                            },
                        );
                    });
                }

                if response.dragged() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                    let ptr_x = response.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
                    let snapshot = ui
                        .ctx()
                        .data_mut(|data| data.get_temp::<DragSnapshot>(drag_id(task.id)));
                    if let Some(snapshot) = snapshot {
                        let days = viewport.drag_days(ptr_x - snapshot.start_pointer_x);
                        interaction.moved = Some(TaskMove {
                            task_id: task.id,
                            start: snapshot.start + Duration::days(days),
                            end: snapshot.end + Duration::days(days),
                        });
                    }
                }

                if response.drag_stopped() {
                    ui.ctx().data_mut(|data| data.remove::<DragSnapshot>(drag_id(task.id)));
                }

                if response.hovered() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        Id::new(("task-tip", task.id)),
                        |ui| {
                            ui.strong(&task.name);
                            if task.is_milestone() {
                                ui.label(task.start.format("%Y-%m-%d").to_string());
                            } else {
                                ui.label(format!(
                                    "{} → {}",
                                    task.start.format("%Y-%m-%d"),
                                    task.end.format("%Y-%m-%d"),
                                ));
                            }
                            ui.label(format!("Progress: {}%", task.progress));
                            if let Some(assignee) = &task.assignee {
                                ui.label(format!("Assignee: {assignee}"));
                            }
                            if is_critical {
                                ui.colored_label(theme::CRITICAL, "On the critical path");
                            }
                        },
                    );
                }
            }

            // Empty click on background clears selection
            if response.clicked() && !consumed_click {
                *selected_task = None;
            }
        });

    interaction
}

fn drag_id(task_id: TaskId) -> Id {
    Id::new(("drag", task_id))
}

fn row_top(origin: Pos2, row: usize) -> f32 {
    origin.y + HEADER_HEIGHT + row as f32 * (ROW_HEIGHT + ROW_PADDING)
}

fn row_center(origin: Pos2, row: usize) -> f32 {
    row_top(origin, row) + ROW_PADDING + ROW_HEIGHT / 2.0
}

fn date_x(origin: Pos2, frame: &GanttFrame<'_>, viewport: &TimelineViewport, axis: &TimelineAxis, date: NaiveDate) -> f32 {
    origin.x + viewport.units_to_x(frame.layout.view.units_between(axis.start, date))
}

fn draw_timeline_header(
    painter: &egui::Painter,
    origin: Pos2,
    frame: &GanttFrame<'_>,
    viewport: &TimelineViewport,
    axis: &TimelineAxis,
    width: f32,
    height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for bucket in &frame.layout.headers {
        let x = date_x(origin, frame, viewport, axis, bucket.start.max(axis.start));
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
            Stroke::new(0.8, theme::GRID_LINE_STRONG),
        );
        painter.text(
            Pos2::new(x + 4.0, origin.y + 12.0),
            egui::Align2::LEFT_CENTER,
            &bucket.label,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );

        for sub in &bucket.subs {
            if !axis.contains(sub.date) {
                continue;
            }
            let sx = date_x(origin, frame, viewport, axis, sub.date);
            painter.line_segment(
                [
                    Pos2::new(sx, origin.y + HEADER_HEIGHT),
                    Pos2::new(sx, origin.y + height),
                ],
                Stroke::new(0.5, theme::GRID_LINE),
            );
            if viewport.pixels_per_unit >= 20.0 {
                painter.text(
                    Pos2::new(sx + 3.0, origin.y + 30.0),
                    egui::Align2::LEFT_CENTER,
                    &sub.label,
                    theme::font_sub(),
                    theme::TEXT_SECONDARY,
                );
            }
        }
    }
}

fn draw_today_line(
    painter: &egui::Painter,
    origin: Pos2,
    frame: &GanttFrame<'_>,
    viewport: &TimelineViewport,
    axis: &TimelineAxis,
    height: f32,
) {
    let today = chrono::Local::now().date_naive();
    if !axis.contains(today) {
        return;
    }
    let x = date_x(origin, frame, viewport, axis, today);

    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

/// Elbow connectors from predecessor end to dependent start.
fn draw_dependency_arrows(
    painter: &egui::Painter,
    origin: Pos2,
    frame: &GanttFrame<'_>,
    viewport: &TimelineViewport,
) {
    // Non-critical first so highlighted arrows end up on top.
    let mut edges: Vec<_> = frame.edges.iter().collect();
    edges.sort_by_key(|e| e.critical);

    for edge in edges {
        let Some(ends) = edge.endpoints(&frame.layout) else { continue };
        let (color, width) = if edge.critical {
            (theme::CRITICAL, 1.8)
        } else {
            (theme::ARROW, 1.0)
        };
        let stroke = Stroke::new(width, color);

        let from = Pos2::new(origin.x + viewport.units_to_x(ends.from_units), row_center(origin, ends.from_row));
        let to = Pos2::new(origin.x + viewport.units_to_x(ends.to_units), row_center(origin, ends.to_row));
        let elbow_x = from.x + ARROW_ELBOW;

        let points = if elbow_x <= to.x - ARROW_ELBOW {
            vec![from, Pos2::new(elbow_x, from.y), Pos2::new(elbow_x, to.y), to]
        } else {
            // Dependent starts before the predecessor ends: route around.
            let mid_y = (from.y + to.y) / 2.0;
            let back_x = to.x - ARROW_ELBOW;
            vec![
                from,
                Pos2::new(elbow_x, from.y),
                Pos2::new(elbow_x, mid_y),
                Pos2::new(back_x, mid_y),
                Pos2::new(back_x, to.y),
                to,
            ]
        };
        for pair in points.windows(2) {
            painter.line_segment([pair[0], pair[1]], stroke);
        }
        painter.add(egui::Shape::convex_polygon(
            vec![
                to,
                Pos2::new(to.x - ARROW_HEAD, to.y - ARROW_HEAD * 0.8),
                Pos2::new(to.x - ARROW_HEAD, to.y + ARROW_HEAD * 0.8),
            ],
            color,
            Stroke::NONE,
        ));
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &TimelineViewport,
    task: &Task,
    bar: &TaskBar,
    y: f32,
    is_selected: bool,
    is_critical: bool,
) -> Rect {
    let x_start = origin.x + viewport.units_to_x(bar.offset);
    let bar_width = viewport.units_to_x(bar.duration).max(6.0);
    let inset = theme::BAR_INSET;
    let color = theme::task_color(task.id);

    let bar_rect = Rect::from_min_size(
        Pos2::new(x_start, y + inset),
        Vec2::new(bar_width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, color);

    if task.progress > 0 {
        let fraction = f32::from(task.progress.min(100)) / 100.0;
        let progress_rect =
            Rect::from_min_size(bar_rect.min, Vec2::new(bar_width * fraction, bar_rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if is_critical {
        painter.rect_stroke(bar_rect, rounding, Stroke::new(2.0, theme::CRITICAL));
    }
    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Task name on bar (single line, clipped to bar bounds)
    if bar_width > 30.0 {
        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = y + inset + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }

    bar_rect
}

#[allow(clippy::too_many_arguments)]
fn draw_milestone(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &TimelineViewport,
    task: &Task,
    bar: &TaskBar,
    y: f32,
    is_selected: bool,
    is_critical: bool,
) -> Rect {
    let x = origin.x + viewport.units_to_x(bar.offset + bar.duration / 2.0);
    let center = Pos2::new(x, y + ROW_HEIGHT / 2.0);
    let size = (ROW_HEIGHT / 2.0 - 3.0).max(6.0);

    let points = vec![
        Pos2::new(center.x, center.y - size),
        Pos2::new(center.x + size, center.y),
        Pos2::new(center.x, center.y + size),
        Pos2::new(center.x - size, center.y),
    ];
    let fill = if is_critical { theme::CRITICAL } else { theme::task_color(task.id) };
    painter.add(egui::Shape::convex_polygon(points.clone(), fill, Stroke::NONE));

    if is_selected {
        painter.add(egui::Shape::convex_polygon(
            points,
            Color32::TRANSPARENT,
            Stroke::new(2.0, theme::BORDER_ACCENT),
        ));
    }

    painter.text(
        Pos2::new(x + size + 6.0, y + ROW_HEIGHT / 2.0),
        egui::Align2::LEFT_CENTER,
        &task.name,
        theme::font_bar(),
        theme::TEXT_SECONDARY,
    );

    Rect::from_center_size(center, Vec2::splat(size * 2.0 + 2.0))
}

/// Groups draw no bar; a bracket under the label marks their span.
fn draw_group_label(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &TimelineViewport,
    task: &Task,
    bar: &TaskBar,
    y: f32,
) {
    let x_start = origin.x + viewport.units_to_x(bar.offset);
    let x_end = origin.x + viewport.units_to_x(bar.end_offset());
    let line_y = y + ROW_HEIGHT - 6.0;
    let stroke = Stroke::new(1.5, theme::GROUP_TEXT);
    painter.line_segment([Pos2::new(x_start, line_y), Pos2::new(x_end, line_y)], stroke);
    for x in [x_start, x_end] {
        painter.line_segment([Pos2::new(x, line_y - 4.0), Pos2::new(x, line_y)], stroke);
    }
    painter.text(
        Pos2::new(x_start + 2.0, y + ROW_HEIGHT / 2.0 - 3.0),
        egui::Align2::LEFT_CENTER,
        &task.name,
        theme::font_bar(),
        theme::GROUP_TEXT,
    );
}
