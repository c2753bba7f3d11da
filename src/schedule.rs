//! Turning an undated plan outline into scheduled tasks.
//!
//! Plan items carry durations in working days and finish-to-start
//! dependencies. Scheduling places each item on a five-day work week: an item
//! starts on the first workday after the latest of its predecessors ends, and
//! groups span whatever their children end up covering.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GanttError, Result};
use crate::graph::topological_sort;
use crate::model::{Task, TaskId, TaskKind};

/// One entry of a plan outline, before dates are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub id: TaskId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    /// Working days. Milestones and groups ignore it.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub progress: u8,
}

/// Longest duration an outline may ask for, in working days.
pub const MAX_DURATION: u32 = 10_000;

fn default_duration() -> u32 {
    1
}

impl PlanItem {
    pub fn new(id: TaskId, name: impl Into<String>, duration: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind: TaskKind::Task,
            duration,
            dependencies: Vec::new(),
            parent_id: None,
            assignee: None,
            progress: 0,
        }
    }
}

pub fn is_workday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `date` itself if it is a workday, otherwise the following Monday.
/// `None` past the end of the calendar.
pub fn next_workday(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.checked_add_days(Days::new(2)),
        Weekday::Sun => date.checked_add_days(Days::new(1)),
        _ => Some(date),
    }
}

/// The workday `n` working days after `date` (rolled onto a workday first).
/// `None` when the result does not fit in a `NaiveDate`.
pub fn add_workdays(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    let start = next_workday(date)?;
    let mut result = start.checked_add_days(Days::new(u64::from(n / 5) * 7))?;
    for _ in 0..n % 5 {
        result = next_workday(result.checked_add_days(Days::new(1))?)?;
    }
    Some(result)
}

fn out_of_range(id: TaskId) -> GanttError {
    GanttError::InvalidTask {
        task_id: id,
        reason: "duration out of range".to_string(),
    }
}

/// Assign dates to every plan item.
///
/// Items without dependencies start on the first workday on or after
/// `project_start`. Dependencies declared on a group also hold for
/// everything inside it. Dangling ids are ignored; a dependency cycle is an
/// error. Output keeps the input order.
pub fn schedule(items: &[PlanItem], project_start: NaiveDate) -> Result<Vec<Task>> {
    let by_id: HashMap<TaskId, &PlanItem> = items.iter().map(|i| (i.id, i)).collect();

    let mut effective: HashMap<TaskId, Vec<TaskId>> = HashMap::with_capacity(items.len());
    let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();
    for item in items {
        graph.add_node(item.id);
    }
    for item in items {
        let deps = effective_dependencies(item, &by_id);
        for &dep in &deps {
            graph.add_edge(dep, item.id, ());
        }
        if let Some(parent) = item.parent_id.and_then(|p| by_id.get(&p)) {
            if parent.kind == TaskKind::Group {
                graph.add_edge(item.id, parent.id, ());
            }
        }
        effective.insert(item.id, deps);
    }

    let order = topological_sort(&graph)?;
    let mut dates: HashMap<TaskId, (NaiveDate, NaiveDate)> = HashMap::with_capacity(items.len());
    for id in order {
        let Some(item) = by_id.get(&id) else { continue };
        let latest_predecessor = effective
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|dep| dates.get(dep).map(|&(_, end)| end))
            .max();
        let earliest = match latest_predecessor {
            Some(end) => end.checked_add_days(Days::new(1)).and_then(next_workday),
            None => next_workday(project_start),
        }
        .ok_or_else(|| out_of_range(id))?;

        let span = match item.kind {
            TaskKind::Task => {
                let end = add_workdays(earliest, item.duration.max(1) - 1)
                    .ok_or_else(|| out_of_range(id))?;
                (earliest, end)
            }
            TaskKind::Milestone => (earliest, earliest),
            TaskKind::Group => items
                .iter()
                .filter(|c| c.parent_id == Some(id) && c.id != id)
                .filter_map(|c| dates.get(&c.id))
                .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, &(s, e)| match acc {
                    Some((lo, hi)) => Some((lo.min(s), hi.max(e))),
                    None => Some((s, e)),
                })
                .unwrap_or((earliest, earliest)),
        };
        dates.insert(id, span);
    }

    let tasks: Vec<Task> = items
        .iter()
        .filter_map(|item| {
            let &(start, end) = dates.get(&item.id)?;
            Some(Task {
                id: item.id,
                name: item.name.clone(),
                start,
                end,
                kind: item.kind,
                progress: item.progress.min(100),
                dependencies: item.dependencies.clone(),
                parent_id: item.parent_id,
                assignee: item.assignee.clone(),
            })
        })
        .collect();

    debug!(items = items.len(), %project_start, "plan scheduled");
    Ok(tasks)
}

/// Own dependencies plus those of every enclosing group, existing ids only.
fn effective_dependencies(item: &PlanItem, by_id: &HashMap<TaskId, &PlanItem>) -> Vec<TaskId> {
    let mut deps = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(item);
    while let Some(node) = current {
        if !seen.insert(node.id) {
            break;
        }
        for &dep in &node.dependencies {
            if !by_id.contains_key(&dep) {
                warn!(task = item.id, dependency = dep, "ignoring dangling plan dependency");
                continue;
            }
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }
        current = node
            .parent_id
            .and_then(|p| by_id.get(&p).copied())
            .filter(|p| p.kind == TaskKind::Group);
    }
    deps
}
