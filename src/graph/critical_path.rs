use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use super::DependencyGraph;
use crate::error::Result;
use crate::model::{Task, TaskId};

/// Best continuation found from one task towards a terminal task.
#[derive(Debug, Clone, Copy)]
struct Step {
    /// End date of the terminal task the chain finishes on.
    end: NaiveDate,
    /// Dependent chosen to continue the chain, `None` for terminal tasks.
    next: Option<TaskId>,
}

/// Ids on the longest dependency chain ending at the latest-finishing task.
///
/// Every start node (a task without dependencies) is followed forward through
/// its dependents, always continuing into the dependent whose chain finishes
/// latest. Equal end dates keep the first dependent in task-list order, and
/// equal start chains keep the first start node. Once a terminal task is
/// reached the chain is extended backwards through each task's first declared
/// dependency only, stopping as soon as that entry is missing or a group.
///
/// Groups never take part. Dependencies on missing or group tasks are ignored.
/// A cycle anywhere among the schedulable tasks fails the whole computation.
pub fn critical_path(tasks: &[Task]) -> Result<BTreeSet<TaskId>> {
    let graph = DependencyGraph::new(tasks);
    let order = graph.topological_order()?;

    // Request-local memo, filled dependents-first so every lookup below hits.
    let mut memo: HashMap<TaskId, Step> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let Some(task) = graph.get(id) else { continue };
        let mut step = Step {
            end: task.end,
            next: None,
        };
        let mut best: Option<NaiveDate> = None;
        for &dependent in graph.dependents(id) {
            let Some(candidate) = memo.get(&dependent) else { continue };
            if best.map_or(true, |end| candidate.end > end) {
                best = Some(candidate.end);
                step = Step {
                    end: candidate.end,
                    next: Some(dependent),
                };
            }
        }
        memo.insert(id, step);
    }

    let mut winner: Option<(TaskId, NaiveDate)> = None;
    for start in graph.start_nodes() {
        let Some(step) = memo.get(&start.id) else { continue };
        if winner.map_or(true, |(_, end)| step.end > end) {
            winner = Some((start.id, step.end));
        }
    }

    let Some((start, end)) = winner else {
        return Ok(BTreeSet::new());
    };

    let mut path = vec![start];
    let mut current = start;
    while let Some(next) = memo.get(&current).and_then(|s| s.next) {
        path.push(next);
        current = next;
    }
    // `current` is terminal: walk back along first-listed dependencies.
    while let Some(first) = graph
        .get(current)
        .and_then(|task| task.dependencies.first().copied())
        .filter(|&id| graph.contains(id))
    {
        path.push(first);
        current = first;
    }

    let ids: BTreeSet<TaskId> = path.into_iter().filter(|id| graph.contains(*id)).collect();
    debug!(start, %end, len = ids.len(), "critical path computed");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GanttError;
    use chrono::Duration;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap() + Duration::days(offset)
    }

    fn task(id: TaskId, start: i64, end: i64, deps: &[TaskId]) -> Task {
        Task::new(id, format!("t{id}"), day(start), day(end)).with_dependencies(deps.iter().copied())
    }

    fn set(ids: &[TaskId]) -> BTreeSet<TaskId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn empty_input_has_no_path() {
        assert!(critical_path(&[]).unwrap().is_empty());
    }

    #[test]
    fn linear_chain() {
        let tasks = vec![task(1, 0, 2, &[]), task(2, 3, 5, &[1]), task(3, 6, 9, &[2])];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[1, 2, 3]));
    }

    #[test]
    fn diamond_prefers_later_branch() {
        // B (2) finishes after C (3); D joins both.
        let tasks = vec![
            task(1, 0, 2, &[]),
            task(2, 3, 10, &[1]),
            task(3, 3, 5, &[1]),
            task(4, 11, 14, &[2, 3]),
        ];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[1, 2, 4]));
    }

    #[test]
    fn picks_branch_with_latest_terminal() {
        let tasks = vec![
            task(1, 0, 1, &[]),
            task(2, 2, 4, &[1]),
            task(3, 2, 20, &[1]),
            task(4, 5, 6, &[2]),
        ];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[1, 3]));
    }

    #[test]
    fn isolated_task_is_its_own_path() {
        let tasks = vec![task(1, 0, 3, &[])];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[1]));
    }

    #[test]
    fn latest_start_chain_wins() {
        let tasks = vec![
            task(1, 0, 2, &[]),
            task(2, 3, 4, &[1]),
            task(5, 0, 1, &[]),
            task(6, 2, 30, &[5]),
        ];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[5, 6]));
    }

    #[test]
    fn ties_keep_first_dependent() {
        let tasks = vec![task(1, 0, 1, &[]), task(2, 2, 5, &[1]), task(3, 2, 5, &[1])];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[1, 2]));
    }

    #[test]
    fn dangling_dependencies_are_ignored() {
        let tasks = vec![task(1, 0, 2, &[]), task(2, 3, 5, &[1, 77])];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[1, 2]));
    }

    #[test]
    fn backward_walk_stops_at_dangling_first_dependency() {
        // Terminal 3 lists the missing 99 first; 4 must not be pulled in.
        let tasks = vec![
            task(1, 0, 1, &[]),
            task(4, 0, 0, &[]),
            task(2, 2, 4, &[1]),
            task(3, 5, 8, &[99, 4, 2]),
        ];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[1, 2, 3]));
    }

    #[test]
    fn backward_walk_follows_first_declared_dependency() {
        let tasks = vec![
            task(1, 0, 1, &[]),
            task(4, 0, 3, &[]),
            task(2, 2, 4, &[1]),
            task(3, 5, 8, &[4, 2]),
        ];
        assert_eq!(critical_path(&tasks).unwrap(), set(&[1, 2, 3, 4]));
    }

    #[test]
    fn groups_do_not_participate() {
        let mut tasks = vec![task(1, 0, 2, &[]), task(2, 3, 5, &[1])];
        tasks.push(Task::group(10, "Phase", day(0), day(90)).with_dependencies([2]));
        let path = critical_path(&tasks).unwrap();
        assert!(!path.contains(&10));
        assert_eq!(path, set(&[1, 2]));
    }

    #[test]
    fn two_node_cycle_is_an_error() {
        let tasks = vec![task(1, 0, 1, &[2]), task(2, 0, 1, &[1])];
        match critical_path(&tasks) {
            Err(GanttError::CyclicDependency { cycle, .. }) => assert_eq!(cycle, vec![1, 2]),
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn cycle_away_from_start_nodes_still_fails() {
        let tasks = vec![
            task(1, 0, 1, &[]),
            task(2, 2, 3, &[1]),
            task(3, 4, 5, &[4]),
            task(4, 4, 5, &[3]),
        ];
        assert!(critical_path(&tasks).is_err());
    }

    #[test]
    fn long_chain_does_not_recurse() {
        let tasks: Vec<Task> = (1..=20_000u32)
            .map(|id| {
                let deps: Vec<TaskId> = if id == 1 { vec![] } else { vec![id - 1] };
                task(id, i64::from(id), i64::from(id), &deps)
            })
            .collect();
        assert_eq!(critical_path(&tasks).unwrap().len(), 20_000);
    }
}
