use chrono::{Datelike, Duration, NaiveDate};

use super::ViewMode;
use crate::model::Task;

/// Extra days after the last task end so the final bar and header never clip.
pub const AXIS_PAD_DAYS: i64 = 7;

/// Monday on or before `date`.
pub fn week_floor(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Shared date range every bar is positioned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineAxis {
    /// Monday of the week holding the earliest task date.
    pub start: NaiveDate,
    /// Latest task date plus [`AXIS_PAD_DAYS`].
    pub end: NaiveDate,
}

impl TimelineAxis {
    /// Bounds spanning every task, or `None` when there are no tasks.
    ///
    /// Both ends of each task are considered, so a task entered with
    /// reversed dates still fits on the axis.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Option<Self> {
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for task in tasks {
            let lo = task.start.min(task.end);
            let hi = task.start.max(task.end);
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
        let (earliest, latest) = bounds?;
        Some(Self {
            start: week_floor(earliest),
            end: latest + Duration::days(AXIS_PAD_DAYS),
        })
    }

    pub fn total_units(&self, view: ViewMode) -> f64 {
        view.units_between(self.start, self.end).max(0.0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
