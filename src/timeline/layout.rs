use std::collections::HashMap;

use tracing::debug;

use super::{build_headers, HeaderBucket, TimelineAxis, ViewMode};
use crate::model::{Task, TaskId, TaskKind};

/// Width given to milestones, in view units, whatever their dates.
pub const MILESTONE_UNITS: f64 = 0.5;
/// Narrowest bar a regular task is drawn with, in view units.
pub const MIN_TASK_UNITS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarShape {
    Bar,
    /// Milestone marker.
    Diamond,
    /// Group rows keep their slot but draw no bar.
    Hidden,
}

/// Placement of one task on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskBar {
    pub task_id: TaskId,
    /// Row index in the order the tasks were supplied.
    pub row: usize,
    pub shape: BarShape,
    /// Units from axis start to task start.
    pub offset: f64,
    /// Units from task start to task end, after minimum-size rules.
    pub duration: f64,
    pub left_pct: f64,
    pub width_pct: f64,
}

impl TaskBar {
    pub fn end_offset(&self) -> f64 {
        self.offset + self.duration
    }

    pub fn is_visible(&self) -> bool {
        self.shape != BarShape::Hidden
    }
}

/// Everything a renderer needs to draw the chart for one view mode.
#[derive(Debug, Clone)]
pub struct TimelineLayout {
    pub view: ViewMode,
    /// `None` when there are no tasks.
    pub axis: Option<TimelineAxis>,
    pub total_units: f64,
    pub headers: Vec<HeaderBucket>,
    pub bars: Vec<TaskBar>,
    rows_by_id: HashMap<TaskId, usize>,
}

impl TimelineLayout {
    /// Lay out `tasks` in the given order, one row each.
    pub fn compute<'a>(tasks: impl IntoIterator<Item = &'a Task>, view: ViewMode) -> Self {
        let tasks: Vec<&Task> = tasks.into_iter().collect();
        let Some(axis) = TimelineAxis::from_tasks(tasks.iter().copied()) else {
            return Self::empty(view);
        };

        let total_units = axis.total_units(view);
        let bars: Vec<TaskBar> = tasks
            .iter()
            .enumerate()
            .map(|(row, task)| place(task, row, &axis, view, total_units))
            .collect();
        let rows_by_id = bars.iter().map(|b| (b.task_id, b.row)).collect();

        debug!(
            view = view.label(),
            tasks = tasks.len(),
            total_units,
            start = %axis.start,
            end = %axis.end,
            "timeline layout computed"
        );

        Self {
            view,
            axis: Some(axis),
            total_units,
            headers: build_headers(&axis, view),
            bars,
            rows_by_id,
        }
    }

    pub fn empty(view: ViewMode) -> Self {
        Self {
            view,
            axis: None,
            total_units: 0.0,
            headers: Vec::new(),
            bars: Vec::new(),
            rows_by_id: HashMap::new(),
        }
    }

    pub fn bar(&self, id: TaskId) -> Option<&TaskBar> {
        self.rows_by_id.get(&id).and_then(|&row| self.bars.get(row))
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.rows_by_id.contains_key(&id)
    }
}

fn place(task: &Task, row: usize, axis: &TimelineAxis, view: ViewMode, total: f64) -> TaskBar {
    let offset = view.units_between(axis.start, task.start).max(0.0);
    let raw = view.units_between(task.start, task.end);
    let (shape, duration) = match task.kind {
        TaskKind::Milestone => (BarShape::Diamond, MILESTONE_UNITS),
        TaskKind::Group => (BarShape::Hidden, raw.max(0.0)),
        TaskKind::Task => (BarShape::Bar, raw.max(MIN_TASK_UNITS)),
    };
    let (left_pct, width_pct) = if total > 0.0 {
        (
            (offset / total * 100.0).max(0.0),
            (duration / total * 100.0).max(0.0),
        )
    } else {
        (0.0, 0.0)
    };
    TaskBar {
        task_id: task.id,
        row,
        shape,
        offset,
        duration,
        left_pct,
        width_pct,
    }
}
