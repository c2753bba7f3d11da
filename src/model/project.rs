use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::task::{Task, TaskId};
use crate::error::{GanttError, Result};
use crate::graph::{self, DependencyGraph, DisplayRow};
use crate::timeline::{dependency_edges, DependencyEdge, TimelineLayout, ViewMode};

/// A Gantt project: the task list plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<Task>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            tasks: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

/// Everything the chart draws for one view: rows in display order, their
/// layout, the critical set and the dependency edges between rows.
#[derive(Debug, Clone)]
pub struct GanttFrame<'a> {
    pub rows: Vec<DisplayRow<'a>>,
    pub layout: TimelineLayout,
    pub critical: BTreeSet<TaskId>,
    pub edges: Vec<DependencyEdge>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_tasks(name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::new(name)
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Next free id; ids start at 1.
    pub fn next_id(&self) -> TaskId {
        self.tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
    }

    pub fn add_task(&mut self, mut task: Task) -> TaskId {
        task.normalize();
        let id = task.id;
        self.tasks.push(task);
        self.touch();
        id
    }

    /// Remove a task together with its descendants, and every dependency on
    /// them. Returns how many tasks were removed.
    pub fn remove_task(&mut self, id: TaskId) -> usize {
        let mut doomed: HashSet<TaskId> = HashSet::from([id]);
        loop {
            let before = doomed.len();
            for task in &self.tasks {
                if task.parent_id.is_some_and(|p| doomed.contains(&p)) {
                    doomed.insert(task.id);
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        let count = self.tasks.len();
        self.tasks.retain(|t| !doomed.contains(&t.id));
        for task in &mut self.tasks {
            task.dependencies.retain(|d| !doomed.contains(d));
        }
        let removed = count - self.tasks.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Validate every task, id uniqueness and acyclicity.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            task.validate()?;
            if !seen.insert(task.id) {
                return Err(GanttError::DuplicateTaskId(task.id));
            }
        }
        DependencyGraph::new(&self.tasks).topological_order()?;
        Ok(())
    }

    /// Stretch each group with children over `[earliest child start, latest
    /// child end]`, deepest groups first so nested groups roll up.
    pub fn recalculate_group_dates(&mut self) {
        let levels: HashMap<TaskId, usize> = graph::display_order(&self.tasks)
            .into_iter()
            .map(|row| (row.task.id, row.level))
            .collect();

        let mut groups: Vec<(usize, TaskId)> = self
            .tasks
            .iter()
            .filter(|t| t.is_group())
            .map(|t| (levels.get(&t.id).copied().unwrap_or(0), t.id))
            .collect();
        groups.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, group_id) in groups {
            let span = self
                .tasks
                .iter()
                .filter(|t| t.parent_id == Some(group_id) && t.id != group_id)
                .fold(None, |acc: Option<(_, _)>, t| match acc {
                    Some((s, e)) => Some((t.start.min(s), t.end.max(e))),
                    None => Some((t.start, t.end)),
                });
            if let (Some((start, end)), Some(group)) = (span, self.task_mut(group_id)) {
                group.start = start;
                group.end = end;
            }
        }
    }

    pub fn critical_path(&self) -> Result<BTreeSet<TaskId>> {
        graph::critical_path(&self.tasks)
    }

    pub fn display_rows(&self) -> Vec<DisplayRow<'_>> {
        graph::display_order(&self.tasks)
    }

    /// Build the render model for `view`. The critical set is left empty when
    /// `highlight_critical` is off, so a cyclic project can still be drawn.
    pub fn gantt_frame(&self, view: ViewMode, highlight_critical: bool) -> Result<GanttFrame<'_>> {
        let critical = if highlight_critical {
            self.critical_path()?
        } else {
            BTreeSet::new()
        };
        let rows = self.display_rows();
        let layout = TimelineLayout::compute(rows.iter().map(|r| r.task), view);
        let edges = dependency_edges(rows.iter().map(|r| r.task), &critical);
        debug!(
            project = %self.name,
            rows = rows.len(),
            edges = edges.len(),
            critical = critical.len(),
            "gantt frame built"
        );
        Ok(GanttFrame {
            rows,
            layout,
            critical,
            edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap() + Duration::days(offset)
    }

    fn sample() -> Project {
        Project::with_tasks(
            "Launch",
            vec![
                Task::group(1, "Build", day(0), day(0)),
                Task::new(2, "Backend", day(0), day(9)).with_parent(1),
                Task::new(3, "Frontend", day(2), day(6)).with_parent(1),
                Task::new(4, "QA", day(10), day(14)).with_dependencies([2, 3]),
                Task::milestone(5, "Release", day(15)).with_dependencies([4]),
            ],
        )
    }

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(Project::new("empty").next_id(), 1);
        assert_eq!(sample().next_id(), 6);
    }

    #[test]
    fn group_dates_roll_up_from_children() {
        let mut project = sample();
        project.recalculate_group_dates();
        let group = project.task(1).unwrap();
        assert_eq!((group.start, group.end), (day(0), day(9)));
    }

    #[test]
    fn nested_groups_roll_up() {
        let mut project = Project::with_tasks(
            "nested",
            vec![
                Task::group(1, "Outer", day(0), day(0)),
                Task::group(2, "Inner", day(0), day(0)).with_parent(1),
                Task::new(3, "Leaf", day(4), day(8)).with_parent(2),
            ],
        );
        project.recalculate_group_dates();
        assert_eq!(project.task(1).unwrap().end, day(8));
        assert_eq!(project.task(2).unwrap().start, day(4));
    }

    #[test]
    fn removing_a_task_drops_descendants_and_links() {
        let mut project = sample();
        assert_eq!(project.remove_task(1), 3);
        let qa = project.task(4).unwrap();
        assert!(qa.dependencies.is_empty());
        assert_eq!(project.tasks.len(), 2);
    }

    #[test]
    fn validate_flags_duplicates_and_cycles() {
        let mut project = sample();
        assert!(project.validate().is_ok());

        project.tasks.push(Task::new(2, "Dup", day(0), day(1)));
        assert!(matches!(project.validate(), Err(GanttError::DuplicateTaskId(2))));

        project.tasks.pop();
        project.task_mut(2).unwrap().dependencies.push(5);
        assert!(matches!(
            project.validate(),
            Err(GanttError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn frame_combines_rows_layout_and_edges() {
        let project = sample();
        let frame = project.gantt_frame(ViewMode::Day, true).unwrap();
        let order: Vec<TaskId> = frame.rows.iter().map(|r| r.task.id).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
        assert_eq!(frame.layout.bars.len(), 5);
        assert_eq!(frame.critical, BTreeSet::from([2, 4, 5]));
        let critical_edges: Vec<(TaskId, TaskId)> = frame
            .edges
            .iter()
            .filter(|e| e.critical)
            .map(|e| (e.from, e.to))
            .collect();
        assert_eq!(critical_edges, vec![(2, 4), (4, 5)]);
    }

    #[test]
    fn frame_without_highlight_tolerates_cycles() {
        let mut project = sample();
        project.task_mut(2).unwrap().dependencies.push(5);
        assert!(project.gantt_frame(ViewMode::Week, true).is_err());
        let frame = project.gantt_frame(ViewMode::Week, false).unwrap();
        assert!(frame.critical.is_empty());
        assert!(frame.edges.iter().all(|e| !e.critical));
    }
}
