//! Error types for the Gantt core and its I/O edges.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::TaskId;

/// Result type for Gantt operations.
pub type Result<T> = std::result::Result<T, GanttError>;

#[derive(Debug, Error)]
pub enum GanttError {
    /// A task depends, directly or transitively, on itself.
    #[error("cyclic dependency involving task {task_id} (cycle: {})", format_ids(.cycle))]
    CyclicDependency {
        /// One task known to sit on the cycle.
        task_id: TaskId,
        /// Every task in the strongly connected component, sorted by id.
        cycle: Vec<TaskId>,
    },

    #[error("task {task_id} ends ({end}) before it starts ({start})")]
    InvalidDateRange {
        task_id: TaskId,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("task {task_id} is invalid: {reason}")]
    InvalidTask { task_id: TaskId, reason: String },

    #[error("duplicate task id {0}")]
    DuplicateTaskId(TaskId),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(String),

    #[error("config error: {0}")]
    Config(String),
}

impl GanttError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for GanttError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

fn format_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_members() {
        let err = GanttError::CyclicDependency {
            task_id: 2,
            cycle: vec![1, 2],
        };
        assert_eq!(
            err.to_string(),
            "cyclic dependency involving task 2 (cycle: 1 -> 2)"
        );
    }

    #[test]
    fn date_range_message() {
        let err = GanttError::InvalidDateRange {
            task_id: 7,
            start: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "task 7 ends (2025-03-01) before it starts (2025-03-10)"
        );
    }
}
