use std::collections::{BTreeSet, HashSet};

use super::TimelineLayout;
use crate::model::{Task, TaskId};

/// A finish-to-start arrow between two rendered tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: TaskId,
    pub to: TaskId,
    /// Both ends lie on the critical path.
    pub critical: bool,
}

/// Arrow geometry in view units and row indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowEndpoints {
    pub from_row: usize,
    /// Right edge of the predecessor bar.
    pub from_units: f64,
    pub to_row: usize,
    /// Left edge of the dependent bar.
    pub to_units: f64,
}

impl DependencyEdge {
    /// Where to draw this edge, or `None` if either end has no visible bar.
    pub fn endpoints(&self, layout: &TimelineLayout) -> Option<ArrowEndpoints> {
        let from = layout.bar(self.from).filter(|b| b.is_visible())?;
        let to = layout.bar(self.to).filter(|b| b.is_visible())?;
        Some(ArrowEndpoints {
            from_row: from.row,
            from_units: from.end_offset(),
            to_row: to.row,
            to_units: to.offset,
        })
    }
}

/// One edge per declared dependency whose two ends are both in `tasks`.
///
/// An edge is critical only when both ends are in `critical`; touching a
/// critical task is not enough.
pub fn dependency_edges<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    critical: &BTreeSet<TaskId>,
) -> Vec<DependencyEdge> {
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let present: HashSet<TaskId> = tasks.iter().map(|t| t.id).collect();

    let mut edges = Vec::new();
    for task in &tasks {
        for &dep in &task.dependencies {
            if dep == task.id || !present.contains(&dep) {
                continue;
            }
            edges.push(DependencyEdge {
                from: dep,
                to: task.id,
                critical: critical.contains(&dep) && critical.contains(&task.id),
            });
        }
    }
    edges
}
