use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GanttError, Result};

/// Stable identifier of a task within a planning session.
pub type TaskId = u32;

/// What a row in the chart represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Task,
    /// Single-day event, rendered as a diamond.
    Milestone,
    /// Container for sub-tasks. Never scheduled on its own.
    Group,
}

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Milestone => "milestone",
            Self::Group => "group",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "task" | "" => Some(Self::Task),
            "milestone" | "ms" => Some(Self::Milestone),
            "group" | "phase" | "summary" => Some(Self::Group),
            _ => None,
        }
    }
}

/// A single task, milestone or group in the Gantt chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    /// Finish-to-start predecessors.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            end,
            kind: TaskKind::Task,
            progress: 0,
            dependencies: Vec::new(),
            parent_id: None,
            assignee: None,
        }
    }

    pub fn milestone(id: TaskId, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            kind: TaskKind::Milestone,
            ..Self::new(id, name, date, date)
        }
    }

    pub fn group(id: TaskId, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            kind: TaskKind::Group,
            ..Self::new(id, name, start, end)
        }
    }

    #[must_use]
    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = deps.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn is_milestone(&self) -> bool {
        self.kind == TaskKind::Milestone
    }

    pub fn is_group(&self) -> bool {
        self.kind == TaskKind::Group
    }

    /// Calendar days between start and end (exclusive end), never negative.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }

    /// Collapse milestones onto their start date.
    pub fn normalize(&mut self) {
        if self.is_milestone() {
            self.end = self.start;
        }
        self.progress = self.progress.min(100);
    }

    /// Check the structural invariants of a single task.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name is empty"));
        }
        if self.progress > 100 {
            return Err(self.invalid(format!("progress {} exceeds 100", self.progress)));
        }
        if self.dependencies.contains(&self.id) {
            return Err(GanttError::CyclicDependency {
                task_id: self.id,
                cycle: vec![self.id],
            });
        }
        if self.parent_id == Some(self.id) {
            return Err(self.invalid("task is its own parent"));
        }
        if !self.is_milestone() && self.end < self.start {
            return Err(GanttError::InvalidDateRange {
                task_id: self.id,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> GanttError {
        GanttError::InvalidTask {
            task_id: self.id,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn deserializes_task_source_shape() {
        let json = r#"{
            "id": 3,
            "name": "Design",
            "start": "2025-01-06",
            "end": "2025-01-10",
            "type": "task",
            "progress": 40,
            "dependencies": [1, 2],
            "parentId": 1
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 3);
        assert_eq!(task.start, d(2025, 1, 6));
        assert_eq!(task.kind, TaskKind::Task);
        assert_eq!(task.dependencies, vec![1, 2]);
        assert_eq!(task.parent_id, Some(1));
        assert!(task.assignee.is_none());
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{"id": 1, "name": "Kickoff", "start": "2025-01-06", "end": "2025-01-06", "type": "milestone"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.is_milestone());
        assert_eq!(task.progress, 0);
        assert!(task.dependencies.is_empty());
    }

    #[test]
    fn validate_rejects_self_dependency() {
        let task = Task::new(4, "Loop", d(2025, 1, 1), d(2025, 1, 2)).with_dependencies([4]);
        assert!(matches!(
            task.validate(),
            Err(GanttError::CyclicDependency { task_id: 4, .. })
        ));
    }

    #[test]
    fn validate_rejects_reversed_dates_but_not_for_milestones() {
        let task = Task::new(1, "Backwards", d(2025, 2, 1), d(2025, 1, 1));
        assert!(matches!(
            task.validate(),
            Err(GanttError::InvalidDateRange { task_id: 1, .. })
        ));

        let mut ms = Task::milestone(2, "Launch", d(2025, 2, 1));
        ms.end = d(2025, 1, 1);
        assert!(ms.validate().is_ok());
        ms.normalize();
        assert_eq!(ms.end, ms.start);
    }

    #[test]
    fn validate_rejects_empty_name() {
        let task = Task::new(1, "  ", d(2025, 1, 1), d(2025, 1, 1));
        assert!(matches!(task.validate(), Err(GanttError::InvalidTask { .. })));
    }

    #[test]
    fn progress_is_clamped() {
        let task = Task::new(1, "A", d(2025, 1, 1), d(2025, 1, 3)).with_progress(250);
        assert_eq!(task.progress, 100);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!(TaskKind::parse("Milestone"), Some(TaskKind::Milestone));
        assert_eq!(TaskKind::parse(" phase "), Some(TaskKind::Group));
        assert_eq!(TaskKind::parse("epic"), None);
    }
}
