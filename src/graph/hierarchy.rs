use std::collections::HashMap;

use crate::model::{Task, TaskId};

/// One row of the flattened task tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRow<'a> {
    pub task: &'a Task,
    /// Indentation depth, 0 for roots.
    pub level: usize,
}

/// Flatten the `parent_id` tree depth-first: parents before children,
/// siblings in their original order.
///
/// Tasks whose parent is missing (or that were never reached from a root,
/// e.g. members of a parent cycle) are appended afterwards as level-0 roots
/// together with their own subtrees. Every input task appears exactly once.
pub fn display_order(tasks: &[Task]) -> Vec<DisplayRow<'_>> {
    let mut children: HashMap<TaskId, Vec<usize>> = HashMap::new();
    for (i, task) in tasks.iter().enumerate() {
        if let Some(parent) = task.parent_id {
            children.entry(parent).or_default().push(i);
        }
    }

    let mut visited = vec![false; tasks.len()];
    let mut rows = Vec::with_capacity(tasks.len());

    let roots = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.parent_id.is_none())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    for root in roots {
        walk(tasks, &children, root, &mut visited, &mut rows);
    }

    // Dangling parents and unreachable subtrees.
    for i in 0..tasks.len() {
        if !visited[i] {
            walk(tasks, &children, i, &mut visited, &mut rows);
        }
    }

    rows
}

fn walk<'a>(
    tasks: &'a [Task],
    children: &HashMap<TaskId, Vec<usize>>,
    root: usize,
    visited: &mut [bool],
    rows: &mut Vec<DisplayRow<'a>>,
) {
    let mut stack = vec![(root, 0usize)];
    while let Some((i, level)) = stack.pop() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let task = &tasks[i];
        rows.push(DisplayRow { task, level });

        if let Some(kids) = children.get(&task.id) {
            for &child in kids.iter().rev() {
                if !visited[child] {
                    stack.push((child, level + 1));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: TaskId, parent: Option<TaskId>) -> Task {
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let task = Task::new(id, format!("t{id}"), day, day);
        match parent {
            Some(p) => task.with_parent(p),
            None => task,
        }
    }

    fn flat(rows: &[DisplayRow<'_>]) -> Vec<(TaskId, usize)> {
        rows.iter().map(|r| (r.task.id, r.level)).collect()
    }

    #[test]
    fn nests_children_under_parents() {
        let tasks = vec![
            task(1, None),
            task(2, Some(1)),
            task(3, Some(2)),
            task(4, None),
            task(5, Some(1)),
        ];
        assert_eq!(
            flat(&display_order(&tasks)),
            vec![(1, 0), (2, 1), (3, 2), (5, 1), (4, 0)]
        );
    }

    #[test]
    fn children_listed_before_parent_still_follow_it() {
        let tasks = vec![task(2, Some(1)), task(1, None)];
        assert_eq!(flat(&display_order(&tasks)), vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn dangling_parent_becomes_root() {
        let tasks = vec![task(1, None), task(2, Some(99)), task(3, Some(2))];
        assert_eq!(
            flat(&display_order(&tasks)),
            vec![(1, 0), (2, 0), (3, 1)]
        );
    }

    #[test]
    fn parent_cycle_keeps_every_task_once() {
        let tasks = vec![task(1, Some(2)), task(2, Some(1)), task(3, None)];
        let rows = display_order(&tasks);
        assert_eq!(flat(&rows), vec![(3, 0), (1, 0), (2, 1)]);
    }

    #[test]
    fn empty_input() {
        assert!(display_order(&[]).is_empty());
    }
}
