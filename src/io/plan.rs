//! Ingest task lists produced by the AI plan generator.
//!
//! The generator answers with JSON, either a bare array or an object with a
//! `tasks` array. Dated task lists carry ISO `YYYY-MM-DD` strings; outlines
//! carry working-day durations and go through [`crate::schedule`].

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::error::{GanttError, Result};
use crate::model::{Task, TaskId, TaskKind};
use crate::schedule::{PlanItem, MAX_DURATION};

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Bare(Vec<T>),
    Wrapped { tasks: Vec<T> },
}

impl<T> Envelope<T> {
    fn into_inner(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { tasks: items } => items,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    id: TaskId,
    name: String,
    start: String,
    end: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    progress: Option<u32>,
    #[serde(default)]
    dependencies: Vec<TaskId>,
    #[serde(default)]
    parent_id: Option<TaskId>,
    #[serde(default)]
    assignee: Option<String>,
}

impl RawTask {
    fn into_task(self) -> Result<Task> {
        let kind = match self.kind.as_deref() {
            None => TaskKind::Task,
            Some(raw) => TaskKind::parse(raw).ok_or_else(|| GanttError::InvalidTask {
                task_id: self.id,
                reason: format!("unknown type '{raw}'"),
            })?,
        };
        let mut task = Task {
            id: self.id,
            name: self.name,
            start: parse_iso_date(&self.start)?,
            end: parse_iso_date(&self.end)?,
            kind,
            progress: u8::try_from(self.progress.unwrap_or(0).min(100)).unwrap_or(100),
            dependencies: self.dependencies,
            parent_id: self.parent_id,
            assignee: self.assignee.filter(|a| !a.trim().is_empty()),
        };
        task.normalize();
        task.validate()?;
        Ok(task)
    }
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time part (`2025-01-06T09:00:00Z`).
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| GanttError::InvalidDate(raw.to_string()))
}

/// Parse a dated task list, validating every task and id uniqueness.
pub fn parse_task_list(json: &str) -> Result<Vec<Task>> {
    let raw: Envelope<RawTask> = serde_json::from_str(json)?;
    let tasks = raw
        .into_inner()
        .into_iter()
        .map(RawTask::into_task)
        .collect::<Result<Vec<_>>>()?;
    ensure_unique(tasks.iter().map(|t| t.id))?;
    info!(tasks = tasks.len(), "task list parsed");
    Ok(tasks)
}

/// Parse a plan outline (durations instead of dates).
pub fn parse_plan_outline(json: &str) -> Result<Vec<PlanItem>> {
    let items = serde_json::from_str::<Envelope<PlanItem>>(json)?.into_inner();
    for item in &items {
        if item.name.trim().is_empty() {
            return Err(GanttError::InvalidTask {
                task_id: item.id,
                reason: "name is empty".to_string(),
            });
        }
        if item.duration > MAX_DURATION {
            return Err(GanttError::InvalidTask {
                task_id: item.id,
                reason: format!("duration {} exceeds {MAX_DURATION} working days", item.duration),
            });
        }
    }
    ensure_unique(items.iter().map(|i| i.id))?;
    info!(items = items.len(), "plan outline parsed");
    Ok(items)
}

fn ensure_unique(ids: impl Iterator<Item = TaskId>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(GanttError::DuplicateTaskId(id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED: &str = r#"{
        "tasks": [
            {"id": 1, "name": "Discovery", "start": "2025-01-06", "end": "2025-01-10", "type": "group", "progress": 0, "dependencies": []},
            {"id": 2, "name": "Interviews", "start": "2025-01-06", "end": "2025-01-08", "type": "task", "progress": 50, "dependencies": [], "parentId": 1},
            {"id": 3, "name": "Synthesis", "start": "2025-01-09T00:00:00Z", "end": "2025-01-10", "type": "task", "progress": 0, "dependencies": [2], "parentId": 1},
            {"id": 4, "name": "Sign-off", "start": "2025-01-13", "end": "2025-01-14", "type": "milestone", "progress": 0, "dependencies": [3]}
        ]
    }"#;

    #[test]
    fn parses_wrapped_generator_output() {
        let tasks = parse_task_list(GENERATED).unwrap();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].kind, TaskKind::Group);
        assert_eq!(tasks[1].progress, 50);
        assert_eq!(tasks[2].start, NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        // Milestones collapse onto their start date.
        assert_eq!(tasks[3].start, tasks[3].end);
    }

    #[test]
    fn outline_rejects_oversized_duration() {
        let json = r#"[{"id": 1, "name": "Forever", "duration": 4000000000}]"#;
        assert!(matches!(
            parse_plan_outline(json),
            Err(GanttError::InvalidTask { task_id: 1, .. })
        ));

        let ok = format!(r#"[{{"id": 1, "name": "Long", "duration": {MAX_DURATION}}}]"#);
        assert_eq!(parse_plan_outline(&ok).unwrap()[0].duration, MAX_DURATION);
    }

    #[test]
    fn parses_bare_array() {
        let json = r#"[{"id": 1, "name": "Only", "start": "2025-02-03", "end": "2025-02-04"}]"#;
        let tasks = parse_task_list(json).unwrap();
        assert_eq!(tasks[0].kind, TaskKind::Task);
    }

    #[test]
    fn rejects_bad_dates_and_ranges() {
        let bad_date = r#"[{"id": 1, "name": "x", "start": "03/02/2025", "end": "2025-02-04"}]"#;
        assert!(matches!(
            parse_task_list(bad_date),
            Err(GanttError::InvalidDate(_))
        ));

        let reversed = r#"[{"id": 1, "name": "x", "start": "2025-02-05", "end": "2025-02-04"}]"#;
        assert!(matches!(
            parse_task_list(reversed),
            Err(GanttError::InvalidDateRange { task_id: 1, .. })
        ));
    }

    #[test]
    fn rejects_duplicates_and_unknown_types() {
        let dup = r#"[
            {"id": 1, "name": "a", "start": "2025-02-03", "end": "2025-02-04"},
            {"id": 1, "name": "b", "start": "2025-02-03", "end": "2025-02-04"}
        ]"#;
        assert!(matches!(parse_task_list(dup), Err(GanttError::DuplicateTaskId(1))));

        let epic = r#"[{"id": 1, "name": "a", "start": "2025-02-03", "end": "2025-02-04", "type": "epic"}]"#;
        assert!(matches!(parse_task_list(epic), Err(GanttError::InvalidTask { .. })));
    }

    #[test]
    fn outline_round_trip_through_scheduler() {
        let json = r#"{"tasks": [
            {"id": 1, "name": "Draft", "duration": 2},
            {"id": 2, "name": "Review", "duration": 1, "dependencies": [1]}
        ]}"#;
        let items = parse_plan_outline(json).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let tasks = crate::schedule::schedule(&items, monday).unwrap();
        assert_eq!(tasks[1].start, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
    }
}
