//! Property-based tests for the graph and timeline invariants.
//!
//! - The critical path only names schedulable tasks and forms a chain
//! - Display ordering is a permutation with parents ahead of children
//! - Bar geometry stays on the axis for every view

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use datasight_gantt::graph::{critical_path, display_order};
use datasight_gantt::model::{Task, TaskId, TaskKind};
use datasight_gantt::timeline::{BarShape, TimelineLayout, ViewMode, MILESTONE_UNITS, MIN_TASK_UNITS};
use datasight_gantt::GanttError;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn kind_strategy() -> impl Strategy<Value = TaskKind> {
    prop_oneof![
        6 => Just(TaskKind::Task),
        2 => Just(TaskKind::Milestone),
        1 => Just(TaskKind::Group),
    ]
}

/// Tasks with ids `1..=n`. Dependencies and parents only point at earlier
/// tasks, so neither relation can form a cycle.
fn acyclic_tasks(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|n| {
        let per_task = (0..n)
            .map(|i| {
                (
                    kind_strategy(),
                    0i64..120,
                    0i64..30,
                    proptest::collection::vec(0..i.max(1), 0..=i.min(3)),
                    proptest::option::weighted(0.5, 0..i.max(1)),
                )
            })
            .collect::<Vec<_>>();
        per_task.prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (kind, start, len, deps, parent))| {
                    let id = i as TaskId + 1;
                    let start = base() + Duration::days(start);
                    let end = start + Duration::days(len);
                    let mut task = match kind {
                        TaskKind::Task => Task::new(id, format!("t{id}"), start, end),
                        TaskKind::Milestone => Task::milestone(id, format!("m{id}"), start),
                        TaskKind::Group => Task::group(id, format!("g{id}"), start, end),
                    };
                    if i > 0 {
                        let deps: BTreeSet<TaskId> =
                            deps.into_iter().map(|d| d as TaskId + 1).collect();
                        task = task.with_dependencies(deps);
                        if let Some(p) = parent {
                            task = task.with_parent(p as TaskId + 1);
                        }
                    }
                    task
                })
                .collect()
        })
    })
}

// =============================================================================
// Critical path
// =============================================================================

proptest! {
    #[test]
    fn critical_path_names_only_schedulable_tasks(tasks in acyclic_tasks(25)) {
        let critical = critical_path(&tasks).unwrap();
        let schedulable: HashSet<TaskId> =
            tasks.iter().filter(|t| !t.is_group()).map(|t| t.id).collect();

        prop_assert!(critical.iter().all(|id| schedulable.contains(id)));
        prop_assert_eq!(critical.is_empty(), schedulable.is_empty());
    }

    #[test]
    fn critical_path_is_connected(tasks in acyclic_tasks(25)) {
        let critical = critical_path(&tasks).unwrap();
        if critical.len() > 1 {
            let by_id: HashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
            // Every member touches another member through a dependency edge.
            for id in &critical {
                let task = by_id[id];
                let has_critical_dep = task.dependencies.iter().any(|d| critical.contains(d));
                let has_critical_dependent = critical
                    .iter()
                    .any(|other| by_id[other].dependencies.contains(id));
                prop_assert!(has_critical_dep || has_critical_dependent);
            }
        }
    }

    #[test]
    fn critical_path_is_deterministic(tasks in acyclic_tasks(20)) {
        prop_assert_eq!(critical_path(&tasks).unwrap(), critical_path(&tasks).unwrap());
    }

    #[test]
    fn chain_is_fully_critical(len in 1usize..40) {
        let tasks: Vec<Task> = (1..=len as TaskId)
            .map(|id| {
                let start = base() + Duration::days(i64::from(id) * 3);
                let task = Task::new(id, format!("t{id}"), start, start + Duration::days(2));
                if id > 1 { task.with_dependencies([id - 1]) } else { task }
            })
            .collect();
        let critical = critical_path(&tasks).unwrap();
        prop_assert_eq!(critical.len(), len);
    }

    #[test]
    fn closing_a_chain_into_a_ring_is_rejected(len in 2usize..15) {
        let n = len as TaskId;
        let tasks: Vec<Task> = (1..=n)
            .map(|id| {
                let prev = if id == 1 { n } else { id - 1 };
                Task::new(id, format!("t{id}"), base(), base()).with_dependencies([prev])
            })
            .collect();
        match critical_path(&tasks) {
            Err(GanttError::CyclicDependency { cycle, .. }) => {
                prop_assert_eq!(cycle.len(), len);
            }
            other => prop_assert!(false, "expected a cycle error, got {:?}", other),
        }
    }
}

// =============================================================================
// Hierarchical display ordering
// =============================================================================

proptest! {
    #[test]
    fn display_order_is_a_permutation(tasks in acyclic_tasks(30)) {
        let rows = display_order(&tasks);
        prop_assert_eq!(rows.len(), tasks.len());
        let ids: HashSet<TaskId> = rows.iter().map(|r| r.task.id).collect();
        prop_assert_eq!(ids.len(), tasks.len());
    }

    #[test]
    fn parents_precede_children(tasks in acyclic_tasks(30)) {
        let rows = display_order(&tasks);
        let position: HashMap<TaskId, usize> =
            rows.iter().enumerate().map(|(i, r)| (r.task.id, i)).collect();
        let level: HashMap<TaskId, usize> = rows.iter().map(|r| (r.task.id, r.level)).collect();

        for task in &tasks {
            match task.parent_id {
                Some(parent) => {
                    prop_assert!(position[&parent] < position[&task.id]);
                    prop_assert_eq!(level[&task.id], level[&parent] + 1);
                }
                None => prop_assert_eq!(level[&task.id], 0),
            }
        }
    }

    #[test]
    fn parent_cycles_still_list_every_task(n in 2usize..10) {
        let count = n as TaskId;
        let tasks: Vec<Task> = (1..=count)
            .map(|id| {
                let parent = if id == count { 1 } else { id + 1 };
                Task::new(id, format!("t{id}"), base(), base()).with_parent(parent)
            })
            .collect();
        let rows = display_order(&tasks);
        prop_assert_eq!(rows.len(), tasks.len());
    }
}

// =============================================================================
// Timeline layout
// =============================================================================

fn view_strategy() -> impl Strategy<Value = ViewMode> {
    prop_oneof![Just(ViewMode::Day), Just(ViewMode::Week), Just(ViewMode::Month)]
}

proptest! {
    #[test]
    fn bars_stay_on_the_axis(tasks in acyclic_tasks(25), view in view_strategy()) {
        let layout = TimelineLayout::compute(&tasks, view);
        prop_assert!(layout.total_units > 0.0);
        prop_assert_eq!(layout.bars.len(), tasks.len());

        for bar in &layout.bars {
            prop_assert!(bar.offset >= 0.0);
            prop_assert!(bar.duration >= 0.0);
            prop_assert!(bar.left_pct >= 0.0);
            prop_assert!(bar.width_pct >= 0.0);
        }
    }

    #[test]
    fn day_view_bars_end_within_the_axis(tasks in acyclic_tasks(25)) {
        let layout = TimelineLayout::compute(&tasks, ViewMode::Day);
        for bar in &layout.bars {
            prop_assert!(bar.end_offset() <= layout.total_units);
            prop_assert!(bar.left_pct + bar.width_pct <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn bar_shapes_follow_task_kind(tasks in acyclic_tasks(25), view in view_strategy()) {
        let layout = TimelineLayout::compute(&tasks, view);
        for task in &tasks {
            let bar = layout.bar(task.id).unwrap();
            match task.kind {
                TaskKind::Milestone => {
                    prop_assert_eq!(bar.shape, BarShape::Diamond);
                    prop_assert_eq!(bar.duration, MILESTONE_UNITS);
                }
                TaskKind::Group => prop_assert!(!bar.is_visible()),
                TaskKind::Task => {
                    prop_assert_eq!(bar.shape, BarShape::Bar);
                    prop_assert!(bar.duration >= MIN_TASK_UNITS);
                }
            }
        }
    }
}
