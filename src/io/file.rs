use std::path::Path;

use tracing::info;

use crate::error::{GanttError, Result};
use crate::model::Project;

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json).map_err(|e| GanttError::io(path, e))?;
    info!(path = %path.display(), tasks = project.tasks.len(), "project saved");
    Ok(())
}

/// Load a project from a JSON file. Milestones are normalized on the way in.
pub fn load_project(path: &Path) -> Result<Project> {
    let json = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
    let mut project: Project = serde_json::from_str(&json)?;
    for task in &mut project.tasks {
        task.normalize();
    }
    info!(path = %path.display(), tasks = project.tasks.len(), "project loaded");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use chrono::NaiveDate;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.gantt.json");
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let project = Project::with_tasks(
            "Roadmap",
            vec![
                Task::new(1, "Research", day, day + chrono::Duration::days(4)),
                Task::milestone(2, "Review", day + chrono::Duration::days(5))
                    .with_dependencies([1])
                    .with_assignee("Sam"),
            ],
        );

        save_project(&project, &path).unwrap();
        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.name, "Roadmap");
        assert_eq!(loaded.tasks, project.tasks);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"type\": \"milestone\""));
        assert!(raw.contains("\"start\": \"2025-01-06\""));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_project(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GanttError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
