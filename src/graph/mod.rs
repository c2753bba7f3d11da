//! Task graph model: dependency indexing, cycle detection, critical path
//! extraction and hierarchical display ordering.
//!
//! Everything here is a pure function of the task slice it is given. No
//! state survives between calls, so concurrent callers working on different
//! task lists never observe each other.

mod critical_path;
mod hierarchy;

pub use critical_path::critical_path;
pub use hierarchy::{display_order, DisplayRow};

use std::collections::HashMap;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::error::{GanttError, Result};
use crate::model::{Task, TaskId};

/// Dependency edges between schedulable tasks (groups are left out).
///
/// Dangling references and duplicate entries are dropped while indexing, so
/// every edge stored here connects two tasks that exist.
pub struct DependencyGraph<'a> {
    order: Vec<&'a Task>,
    index: HashMap<TaskId, &'a Task>,
    predecessors: HashMap<TaskId, Vec<TaskId>>,
    dependents: HashMap<TaskId, Vec<TaskId>>,
}

impl<'a> DependencyGraph<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        let order: Vec<&Task> = tasks.iter().filter(|t| !t.is_group()).collect();
        let index: HashMap<TaskId, &Task> = order.iter().map(|t| (t.id, *t)).collect();

        let mut predecessors: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
        let mut dependents: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
        for task in &order {
            let preds = predecessors.entry(task.id).or_default();
            for &dep in &task.dependencies {
                if !index.contains_key(&dep) {
                    warn!(task = task.id, dependency = dep, "ignoring dangling dependency");
                    continue;
                }
                if preds.contains(&dep) {
                    continue;
                }
                preds.push(dep);
                dependents.entry(dep).or_default().push(task.id);
            }
        }

        Self {
            order,
            index,
            predecessors,
            dependents,
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&'a Task> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    /// Tasks in the order they were supplied.
    pub fn tasks(&self) -> &[&'a Task] {
        &self.order
    }

    /// Existing predecessors in declaration order.
    pub fn predecessors(&self, id: TaskId) -> &[TaskId] {
        self.predecessors.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Tasks that list `id` as a dependency, in task-list order.
    pub fn dependents(&self, id: TaskId) -> &[TaskId] {
        self.dependents.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Tasks without any (existing) dependency.
    pub fn start_nodes(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|t| self.predecessors(t.id).is_empty())
    }

    /// Predecessors before dependents, or the cycle that prevents it.
    pub fn topological_order(&self) -> Result<Vec<TaskId>> {
        let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();
        for task in &self.order {
            graph.add_node(task.id);
        }
        for task in &self.order {
            for &dep in self.predecessors(task.id) {
                graph.add_edge(dep, task.id, ());
            }
        }
        topological_sort(&graph)
    }
}

/// Sort a dependency graph (edges point from predecessor to dependent).
///
/// On failure the error names the node petgraph tripped over plus every
/// member of its strongly connected component.
pub(crate) fn topological_sort(graph: &DiGraphMap<TaskId, ()>) -> Result<Vec<TaskId>> {
    toposort(graph, None).map_err(|cycle| {
        let task_id = cycle.node_id();
        let mut members = tarjan_scc(graph)
            .into_iter()
            .find(|component| component.contains(&task_id))
            .unwrap_or_else(|| vec![task_id]);
        members.sort_unstable();
        GanttError::CyclicDependency {
            task_id,
            cycle: members,
        }
    })
}
