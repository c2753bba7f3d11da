//! Timeline layout engine.
//!
//! Maps task date ranges onto a shared axis measured in view units (days,
//! weeks or months), builds the header buckets for that axis, and derives the
//! dependency edges a renderer draws between bars. Like the graph model it
//! only depends on the tasks it is handed.

mod arrows;
mod axis;
mod header;
mod layout;
mod viewport;

pub use arrows::{dependency_edges, ArrowEndpoints, DependencyEdge};
pub use axis::{week_floor, TimelineAxis, AXIS_PAD_DAYS};
pub use header::{build_headers, HeaderBucket, SubHeader};
pub use layout::{BarShape, TaskBar, TimelineLayout, MILESTONE_UNITS, MIN_TASK_UNITS};
pub use viewport::TimelineViewport;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Time bucketing used to lay out the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
}

impl ViewMode {
    pub const ALL: [Self; 3] = [Self::Day, Self::Week, Self::Month];

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }

    /// Units between two dates, fractional where the range does not fall on
    /// unit boundaries. Months follow the calendar, so January contributes
    /// 31 days' worth and February 28 or 29.
    pub fn units_between(self, from: NaiveDate, to: NaiveDate) -> f64 {
        match self {
            Self::Day => (to - from).num_days() as f64,
            Self::Week => (to - from).num_days() as f64 / 7.0,
            Self::Month => months_between(from, to),
        }
    }

    /// Rough calendar days per unit, for turning pointer drags into dates.
    pub fn days_per_unit(self) -> f64 {
        match self {
            Self::Day => 1.0,
            Self::Week => 7.0,
            Self::Month => 365.25 / 12.0,
        }
    }

    pub fn default_pixels_per_unit(self) -> f32 {
        match self {
            Self::Day => 28.0,
            Self::Week => 64.0,
            Self::Month => 96.0,
        }
    }

    pub fn next_finer(self) -> Self {
        match self {
            Self::Month => Self::Week,
            Self::Week | Self::Day => Self::Day,
        }
    }

    pub fn next_coarser(self) -> Self {
        match self {
            Self::Day => Self::Week,
            Self::Week | Self::Month => Self::Month,
        }
    }
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn months_between(from: NaiveDate, to: NaiveDate) -> f64 {
    if to < from {
        return -months_between(to, from);
    }
    let raw = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let mut whole = u32::try_from(raw.max(0)).unwrap_or(0);
    let mut anchor = add_months(from, whole);
    while whole > 0 && anchor > to {
        whole -= 1;
        anchor = add_months(from, whole);
    }
    let next = add_months(from, whole + 1);
    let span = (next - anchor).num_days().max(1) as f64;
    f64::from(whole) + (to - anchor).num_days() as f64 / span
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn day_and_week_units() {
        assert_eq!(ViewMode::Day.units_between(d(2025, 1, 6), d(2025, 1, 13)), 7.0);
        assert_eq!(ViewMode::Week.units_between(d(2025, 1, 6), d(2025, 1, 13)), 1.0);
        assert_eq!(ViewMode::Week.units_between(d(2025, 1, 13), d(2025, 1, 6)), -1.0);
    }

    #[test]
    fn month_units_follow_the_calendar() {
        assert_eq!(ViewMode::Month.units_between(d(2025, 1, 1), d(2025, 3, 1)), 2.0);
        assert_eq!(ViewMode::Month.units_between(d(2025, 2, 1), d(2025, 2, 15)), 0.5);
        assert_eq!(ViewMode::Month.units_between(d(2025, 1, 31), d(2025, 2, 28)), 1.0);
        assert_eq!(ViewMode::Month.units_between(d(2025, 3, 1), d(2025, 1, 1)), -2.0);
    }

    #[test]
    fn month_units_when_day_of_month_is_later() {
        // Jan 20 -> Feb 10 is less than one whole month.
        let units = ViewMode::Month.units_between(d(2025, 1, 20), d(2025, 2, 10));
        assert!(units > 0.6 && units < 0.7, "{units}");
    }

    #[test]
    fn zoom_steps_saturate() {
        assert_eq!(ViewMode::Day.next_finer(), ViewMode::Day);
        assert_eq!(ViewMode::Month.next_coarser(), ViewMode::Month);
        assert_eq!(ViewMode::Week.next_coarser(), ViewMode::Month);
    }
}
