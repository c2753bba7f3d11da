use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{GanttError, Result};
use crate::model::{Task, TaskId, TaskKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Start,
    End,
    Kind,
    Progress,
    Dependencies,
    Parent,
    Assignee,
}

/// Fields of one data row, still as text.
#[derive(Default)]
struct Row {
    id: Option<String>,
    name: Option<String>,
    start: Option<String>,
    end: Option<String>,
    kind: Option<String>,
    progress: Option<String>,
    dependencies: Option<String>,
    parent: Option<String>,
    assignee: Option<String>,
}

/// Map a status word or a percentage to progress (0 – 100).
fn parse_progress(raw: &str) -> u8 {
    let s = raw.trim().trim_end_matches('%').trim();
    if let Ok(n) = s.parse::<f64>() {
        // "0.5" style fractions are read as a share of 1.
        let pct = if n > 0.0 && n <= 1.0 && s.contains('.') { n * 100.0 } else { n };
        return pct.clamp(0.0, 100.0).round() as u8;
    }
    match s.to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" => 100,
        "in progress" | "in-progress" | "active" | "started" => 50,
        "released" | "planned" => 25,
        _ => 0,
    }
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "id" | "taskid" | "#" => Some(Column::Id),
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),
        "type" | "kind" | "milestone" | "ismilestone" => Some(Column::Kind),
        "progress" | "status" | "state" | "done" | "complete" => Some(Column::Progress),
        "dependencies" | "dependson" | "deps" | "predecessors" => Some(Column::Dependencies),
        "parent" | "parentid" | "parenttask" | "parentname" | "subtaskof" => Some(Column::Parent),
        "assignee" | "owner" | "assignedto" | "resource" => Some(Column::Assignee),
        _ => None,
    }
}

fn parse_kind(raw: &str) -> TaskKind {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "y" => TaskKind::Milestone,
        "false" | "no" | "0" | "n" => TaskKind::Task,
        other => TaskKind::parse(other).unwrap_or_default(),
    }
}

fn parse_id_list(raw: &str) -> Vec<TaskId> {
    raw.split([',', '|', ' '])
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

/// Import tasks from a CSV file. See [`import_csv_str`].
pub fn import_csv(path: &Path) -> Result<(Vec<Task>, usize)> {
    let content = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
    let result = import_csv_str(&content)?;
    info!(path = %path.display(), tasks = result.0.len(), skipped = result.1, "csv imported");
    Ok(result)
}

/// Import tasks from CSV text.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches column headers
/// flexibly. Rows without an id column get sequential ids starting at 1.
/// Parents resolve by id first, then by task name.
/// Returns `(tasks, skipped_count)` on success.
pub fn import_csv_str(content: &str) -> Result<(Vec<Task>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();
    for required in [Column::Name, Column::Start, Column::End] {
        if !columns.contains(&Some(required)) {
            let found: Vec<&str> = headers.iter().collect();
            return Err(GanttError::Csv(format!(
                "missing required columns, found headers {found:?}; \
                 need columns for task name, start date and end date"
            )));
        }
    }

    let mut parsed: Vec<(Option<TaskId>, Task, Option<String>)> = Vec::new();
    let mut used_ids: HashSet<TaskId> = HashSet::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable csv row");
                skipped += 1;
                continue;
            }
        };

        let mut row = Row::default();
        for (field, column) in record.iter().zip(&columns) {
            let value = Some(field.to_string()).filter(|v| !v.is_empty());
            match column {
                Some(Column::Id) => row.id = value,
                Some(Column::Name) => row.name = value,
                Some(Column::Start) => row.start = value,
                Some(Column::End) => row.end = value,
                Some(Column::Kind) => row.kind = value,
                Some(Column::Progress) => row.progress = value,
                Some(Column::Dependencies) => row.dependencies = value,
                Some(Column::Parent) => row.parent = value,
                Some(Column::Assignee) => row.assignee = value,
                None => {}
            }
        }

        let Some(name) = row.name else {
            skipped += 1;
            continue;
        };
        let Some(start) = row.start.as_deref().and_then(parse_date) else {
            warn!(line, value = ?row.start, "skipping row with invalid start date");
            skipped += 1;
            continue;
        };
        let Some(end) = row.end.as_deref().and_then(parse_date) else {
            warn!(line, value = ?row.end, "skipping row with invalid end date");
            skipped += 1;
            continue;
        };

        let explicit_id = row.id.as_deref().and_then(|s| s.parse::<TaskId>().ok());
        if let Some(id) = explicit_id {
            if !used_ids.insert(id) {
                warn!(line, id, "skipping row with duplicate id");
                skipped += 1;
                continue;
            }
        }

        let kind = row.kind.as_deref().map(parse_kind).unwrap_or_default();
        if kind != TaskKind::Milestone && end < start {
            warn!(line, %start, %end, "end date before start, clamping");
        }
        let mut task = Task::new(0, name, start, end.max(start));
        task.kind = kind;
        task.progress = row.progress.as_deref().map(parse_progress).unwrap_or(0);
        task.dependencies = row.dependencies.as_deref().map(parse_id_list).unwrap_or_default();
        task.assignee = row.assignee;
        task.normalize();

        parsed.push((explicit_id, task, row.parent));
    }

    if parsed.is_empty() {
        return Err(GanttError::Csv(if skipped > 0 {
            format!("no valid tasks found ({skipped} rows skipped)")
        } else {
            "file is empty or has no data rows".to_string()
        }));
    }

    // Assign ids to rows that had none, skipping ids already taken.
    let mut next = 1;
    for (explicit, task, _) in &mut parsed {
        task.id = match explicit {
            Some(id) => *id,
            None => {
                while used_ids.contains(&next) {
                    next += 1;
                }
                used_ids.insert(next);
                next
            }
        };
    }

    // Resolve parents by id, then by (case-insensitive) name.
    let name_to_id: HashMap<String, TaskId> = parsed
        .iter()
        .map(|(_, t, _)| (t.name.to_lowercase(), t.id))
        .collect();
    let mut tasks = Vec::with_capacity(parsed.len());
    for (_, mut task, parent) in parsed {
        if let Some(parent) = parent {
            let resolved = parent
                .parse::<TaskId>()
                .ok()
                .filter(|id| used_ids.contains(id))
                .or_else(|| name_to_id.get(&parent.to_lowercase()).copied());
            match resolved {
                Some(pid) if pid != task.id => task.parent_id = Some(pid),
                Some(_) => {}
                None => warn!(parent = %parent, task = %task.name, "parent task not found"),
            }
        }
        task.dependencies.retain(|&d| d != task.id);
        tasks.push(task);
    }

    Ok((tasks, skipped))
}
