use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use datasight_gantt::config::Settings;
use datasight_gantt::model::{GanttFrame, Project, Task, TaskId, TaskKind};
use datasight_gantt::timeline::{TimelineLayout, TimelineViewport, ViewMode};
use datasight_gantt::{io, schedule};
use tracing::{info, warn};

use crate::ui;
use crate::ui::gantt_chart::TaskMove;
use crate::ui::task_table::TaskTableAction;

/// Fields of the "Add Task" dialog.
pub struct NewTaskForm {
    pub name: String,
    pub kind: TaskKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub dependencies: String,
    pub parent: Option<TaskId>,
    pub assignee: String,
}

impl NewTaskForm {
    fn starting(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            kind: TaskKind::Task,
            start: today,
            end: today + Duration::days(4),
            dependencies: String::new(),
            parent: None,
            assignee: String::new(),
        }
    }
}

/// Main application state.
pub struct GanttApp {
    pub project: Project,
    pub settings: Settings,
    pub view: ViewMode,
    pub viewport: TimelineViewport,
    pub highlight_critical: bool,
    pub file_path: Option<PathBuf>,
    pub selected_task: Option<TaskId>,

    // Dialog state
    pub show_add_task: bool,
    pub show_about: bool,
    pub show_csv_help: bool,
    pub new_task: NewTaskForm,

    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let today = chrono::Local::now().date_naive();
        let view = settings.default_view;
        let mut app = Self {
            project: Self::sample_project(today),
            viewport: settings.viewport(view),
            highlight_critical: settings.highlight_critical,
            view,
            settings,
            file_path: None,
            selected_task: None,
            show_add_task: false,
            show_about: false,
            show_csv_help: false,
            new_task: NewTaskForm::starting(today),
            status_message: "Ready".to_string(),
        };

        if let Some(path) = app.settings.last_project.clone() {
            if path.exists() {
                app.open_path(&path);
            }
        }
        app
    }

    /// A small launch plan showing groups, a milestone and a critical chain.
    fn sample_project(today: NaiveDate) -> Project {
        let day = |n: i64| today + Duration::days(n);
        let mut project = Project::with_tasks(
            "Sample Project",
            vec![
                Task::group(1, "Planning", day(-5), day(8)),
                Task::new(2, "Project Kickoff", day(-5), day(-3))
                    .with_parent(1)
                    .with_progress(100),
                Task::new(3, "Requirements Gathering", day(-2), day(5))
                    .with_parent(1)
                    .with_dependencies([2])
                    .with_progress(60)
                    .with_assignee("Ana"),
                Task::milestone(4, "Planning Complete", day(6))
                    .with_parent(1)
                    .with_dependencies([3]),
                Task::group(5, "Execution", day(7), day(30)),
                Task::new(6, "UI Design", day(7), day(16))
                    .with_parent(5)
                    .with_dependencies([4])
                    .with_assignee("Jo"),
                Task::new(7, "Backend Development", day(7), day(26))
                    .with_parent(5)
                    .with_dependencies([4])
                    .with_assignee("Sam"),
                Task::new(8, "Testing & QA", day(27), day(31))
                    .with_parent(5)
                    .with_dependencies([6, 7]),
                Task::milestone(9, "Launch", day(33)).with_dependencies([8]),
            ],
        );
        project.recalculate_group_dates();
        project
    }

    fn replace_project(&mut self, project: Project, path: Option<PathBuf>) {
        self.project = project;
        self.file_path = path;
        self.selected_task = None;
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        self.replace_project(Project::default(), None);
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .pick_file()
        {
            self.open_path(&path);
        }
    }

    fn open_path(&mut self, path: &Path) {
        match io::load_project(path) {
            Ok(project) => {
                if let Err(e) = project.validate() {
                    warn!(error = %e, "loaded project does not validate");
                }
                self.replace_project(project, Some(path.to_path_buf()));
                self.settings.last_project = Some(path.to_path_buf());
                self.persist_settings();
                self.status_message = "Project loaded".to_string();
            }
            Err(e) => {
                self.status_message = format!("Error loading: {e}");
            }
        }
    }

    pub fn save_project(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.write_project(&path),
            None => self.save_project_as(),
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .set_file_name(format!("{}.gantt.json", self.project.name))
            .save_file()
        {
            self.write_project(&path);
        }
    }

    fn write_project(&mut self, path: &Path) {
        self.project.touch();
        match io::save_project(&self.project, path) {
            Ok(()) => {
                self.file_path = Some(path.to_path_buf());
                self.settings.last_project = Some(path.to_path_buf());
                self.persist_settings();
                self.status_message = "Project saved".to_string();
            }
            Err(e) => self.status_message = format!("Error saving: {e}"),
        }
    }

    /// Ask before throwing away a non-empty project.
    fn confirm_replace(&self, title: &str) -> bool {
        if self.project.tasks.is_empty() {
            return true;
        }
        rfd::MessageDialog::new()
            .set_title(title)
            .set_description("This will replace the current project. Continue?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes
    }

    fn project_name_from(path: &Path, fallback: &str) -> String {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn import_csv(&mut self) {
        if !self.confirm_replace("Import CSV") {
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };
        match io::csv_import::import_csv(&path) {
            Ok((tasks, skipped)) => {
                let count = tasks.len();
                let mut project =
                    Project::with_tasks(Self::project_name_from(&path, "Imported Project"), tasks);
                project.recalculate_group_dates();
                self.replace_project(project, None);
                self.status_message = if skipped > 0 {
                    format!("Imported {count} tasks ({skipped} rows skipped)")
                } else {
                    format!("Imported {count} tasks")
                };
            }
            Err(e) => self.status_message = format!("CSV import failed: {e}"),
        }
    }

    pub fn export_csv(&mut self) {
        if self.project.tasks.is_empty() {
            self.status_message = "Nothing to export, project has no tasks".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.project.name))
            .save_file()
        {
            match io::csv_export::export_csv(&self.project.tasks, &path) {
                Ok(count) => self.status_message = format!("Exported {count} tasks to CSV"),
                Err(e) => self.status_message = format!("CSV export failed: {e}"),
            }
        }
    }

    fn pick_json(&self) -> Option<(PathBuf, String)> {
        let path = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()?;
        match std::fs::read_to_string(&path) {
            Ok(json) => Some((path, json)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read json");
                None
            }
        }
    }

    /// Import a dated task list as produced by the plan generator.
    pub fn import_task_list(&mut self) {
        if !self.confirm_replace("Import Task List") {
            return;
        }
        let Some((path, json)) = self.pick_json() else { return };
        let result = io::plan::parse_task_list(&json).and_then(|tasks| {
            let project = Project::with_tasks(Self::project_name_from(&path, "AI Plan"), tasks);
            project.validate()?;
            Ok(project)
        });
        match result {
            Ok(project) => {
                let count = project.tasks.len();
                self.replace_project(project, None);
                self.status_message = format!("Imported {count} tasks");
            }
            Err(e) => self.status_message = format!("Task list import failed: {e}"),
        }
    }

    /// Import an undated outline and schedule it from today.
    pub fn import_plan_outline(&mut self) {
        if !self.confirm_replace("Import Plan Outline") {
            return;
        }
        let Some((path, json)) = self.pick_json() else { return };
        let today = chrono::Local::now().date_naive();
        let result = io::plan::parse_plan_outline(&json)
            .and_then(|items| schedule::schedule(&items, today));
        match result {
            Ok(tasks) => {
                let count = tasks.len();
                let project = Project::with_tasks(Self::project_name_from(&path, "AI Plan"), tasks);
                self.replace_project(project, None);
                self.status_message = format!("Scheduled {count} tasks from {today}");
            }
            Err(e) => self.status_message = format!("Plan outline import failed: {e}"),
        }
    }

    // --- View ---

    pub fn set_view(&mut self, view: ViewMode) {
        if view == self.view {
            return;
        }
        self.view = view;
        self.viewport = self.settings.viewport(view);
        self.settings.default_view = view;
        self.persist_settings();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.remember_zoom();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.remember_zoom();
    }

    fn remember_zoom(&mut self) {
        self.settings
            .pixels_per_unit
            .set(self.view, self.viewport.pixels_per_unit);
        self.persist_settings();
    }

    pub fn toggle_critical(&mut self) {
        self.highlight_critical = !self.highlight_critical;
        self.settings.highlight_critical = self.highlight_critical;
        self.persist_settings();
    }

    fn persist_settings(&self) {
        if let Err(e) = self.settings.save() {
            warn!(error = %e, "failed to save settings");
        }
    }

    // --- Task operations ---

    /// Create a task from the dialog. Returns `false` (and keeps the dialog
    /// open) when the task does not validate.
    pub fn create_task_from_dialog(&mut self) -> bool {
        let form = &self.new_task;
        let name = if form.name.trim().is_empty() {
            "New Task".to_string()
        } else {
            form.name.trim().to_string()
        };
        let id = self.project.next_id();
        let end = form.end.max(form.start);
        let mut task = match form.kind {
            TaskKind::Task => Task::new(id, name, form.start, end),
            TaskKind::Milestone => Task::milestone(id, name, form.start),
            TaskKind::Group => Task::group(id, name, form.start, end),
        };
        let mut unknown = Vec::new();
        let deps: Vec<TaskId> = form
            .dependencies
            .split([',', ' ', ';'])
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| match s.trim().parse::<TaskId>() {
                Ok(dep) if self.project.task(dep).is_some() => Some(dep),
                _ => {
                    unknown.push(s.trim().to_string());
                    None
                }
            })
            .collect();
        if !unknown.is_empty() {
            self.status_message = format!("Unknown dependency ids: {}", unknown.join(", "));
            return false;
        }
        task = task.with_dependencies(deps);
        if let Some(parent) = form.parent {
            task = task.with_parent(parent);
        }
        if !form.assignee.trim().is_empty() {
            task = task.with_assignee(form.assignee.trim());
        }

        let mut candidate = self.project.clone();
        candidate.add_task(task);
        if let Err(e) = candidate.validate() {
            self.status_message = format!("Cannot add task: {e}");
            return false;
        }
        candidate.recalculate_group_dates();
        self.project = candidate;
        self.selected_task = Some(id);
        self.new_task = NewTaskForm::starting(chrono::Local::now().date_naive());
        self.status_message = "Task added".to_string();
        info!(id, "task added");
        true
    }

    pub fn delete_task(&mut self, id: TaskId) {
        let removed = self.project.remove_task(id);
        if removed == 0 {
            return;
        }
        self.project.recalculate_group_dates();
        if self
            .selected_task
            .is_some_and(|sel| self.project.task(sel).is_none())
        {
            self.selected_task = None;
        }
        self.status_message = if removed == 1 {
            "Task deleted".to_string()
        } else {
            format!("Deleted {removed} tasks")
        };
    }

    fn apply_move(&mut self, moved: TaskMove) {
        let Some(task) = self.project.task_mut(moved.task_id) else { return };
        if task.start == moved.start && task.end == moved.end {
            return;
        }
        task.start = moved.start;
        task.end = moved.end;
        let name = task.name.clone();
        self.project.recalculate_group_dates();
        self.project.touch();
        self.status_message = format!(
            "Updated '{}' ({} → {})",
            name,
            moved.start.format("%Y-%m-%d"),
            moved.end.format("%Y-%m-%d"),
        );
    }

    /// Render model for this frame. A cycle only disables highlighting.
    fn build_frame(project: &Project, view: ViewMode, highlight: bool) -> (GanttFrame<'_>, Option<String>) {
        match project.gantt_frame(view, highlight) {
            Ok(frame) => (frame, None),
            Err(e) => {
                let frame = project
                    .gantt_frame(view, false)
                    .unwrap_or_else(|_| GanttFrame {
                        rows: project.display_rows(),
                        layout: TimelineLayout::empty(view),
                        critical: BTreeSet::new(),
                        edges: Vec::new(),
                    });
                (frame, Some(e.to_string()))
            }
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        if should_save {
            self.save_project();
        }
        let delete_selected = ctx.input(|i| i.key_pressed(egui::Key::Delete))
            && !ctx.wants_keyboard_input();
        if delete_selected {
            if let Some(id) = self.selected_task {
                self.delete_task(id);
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        let (frame, graph_error) =
            Self::build_frame(&self.project, self.view, self.highlight_critical);

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    match &graph_error {
                        Some(err) => ui.label(
                            egui::RichText::new(err)
                                .size(11.0)
                                .color(ui::theme::CRITICAL),
                        ),
                        None => ui.label(
                            egui::RichText::new(&self.status_message)
                                .size(11.0)
                                .color(ui::theme::TEXT_SECONDARY),
                        ),
                    };
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.project.tasks.len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!(
                                "{} · Zoom: {:.0}%",
                                self.view.label(),
                                self.viewport.pixels_per_unit
                                    / self.view.default_pixels_per_unit()
                                    * 100.0
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut task_action = TaskTableAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(240.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                task_action = ui::task_table::show_task_table(
                    &frame.rows,
                    &frame.critical,
                    self.selected_task,
                    ui,
                );
            });

        let pixels_before = self.viewport.pixels_per_unit;
        let mut moved = None;
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = ui::gantt_chart::show_gantt_chart(
                &frame,
                &mut self.viewport,
                &mut self.selected_task,
                ui,
            );
            moved = interaction.moved;
        });

        if self.viewport.pixels_per_unit != pixels_before {
            self.remember_zoom();
        }
        if let Some(moved) = moved {
            self.apply_move(moved);
        }

        match task_action {
            TaskTableAction::Select(id) => self.selected_task = Some(id),
            TaskTableAction::Delete(id) => self.delete_task(id),
            TaskTableAction::Add => self.show_add_task = true,
            TaskTableAction::None => {}
        }

        if self.show_add_task {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
    }
}
