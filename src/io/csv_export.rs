use std::path::Path;

use tracing::info;

use crate::error::{GanttError, Result};
use crate::model::Task;

const HEADER: [&str; 9] = [
    "ID",
    "Name",
    "Start",
    "End",
    "Type",
    "Progress",
    "Dependencies",
    "Parent",
    "Assignee",
];

/// Write tasks as `;`-delimited CSV text with ISO dates.
pub fn export_csv_string(tasks: &[Task]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(HEADER)?;
    for task in tasks {
        let deps = task
            .dependencies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        wtr.write_record([
            task.id.to_string(),
            task.name.clone(),
            task.start.format("%Y-%m-%d").to_string(),
            task.end.format("%Y-%m-%d").to_string(),
            task.kind.label().to_string(),
            task.progress.to_string(),
            deps,
            task.parent_id.map(|p| p.to_string()).unwrap_or_default(),
            task.assignee.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| GanttError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| GanttError::Csv(e.to_string()))
}

/// Export tasks to a CSV file readable by [`super::csv_import::import_csv`].
/// Returns the number of tasks written.
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<usize> {
    let text = export_csv_string(tasks)?;
    std::fs::write(path, text).map_err(|e| GanttError::io(path, e))?;
    info!(path = %path.display(), tasks = tasks.len(), "csv exported");
    Ok(tasks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_import::import_csv;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn export_reimports_identically() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let tasks = vec![
            Task::group(1, "Phase; one", day, day + Duration::days(9)),
            Task::new(2, "Draft", day, day + Duration::days(3))
                .with_parent(1)
                .with_progress(30)
                .with_assignee("Kim"),
            Task::new(3, "Edit", day + Duration::days(4), day + Duration::days(9))
                .with_parent(1)
                .with_dependencies([2]),
            Task::milestone(4, "Publish", day + Duration::days(10)).with_dependencies([2, 3]),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        assert_eq!(export_csv(&tasks, &path).unwrap(), 4);

        let (imported, skipped) = import_csv(&path).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(imported, tasks);
    }

    #[test]
    fn header_and_iso_dates() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let text = export_csv_string(&[Task::new(7, "Solo", day, day)]).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("ID;Name;Start;End;Type;Progress;Dependencies;Parent;Assignee")
        );
        assert_eq!(lines.next(), Some("7;Solo;2025-03-03;2025-03-03;task;0;;;"));
    }
}
