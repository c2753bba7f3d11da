use chrono::{Datelike, Duration, NaiveDate};

use super::{add_months, TimelineAxis, ViewMode};

/// Top header row entry, e.g. a week, a month or a year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBucket {
    pub label: String,
    pub start: NaiveDate,
    pub subs: Vec<SubHeader>,
}

/// Second header row entry inside a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubHeader {
    pub label: String,
    pub date: NaiveDate,
}

/// Header buckets for `view` across `axis`.
///
/// - `Day`: one bucket per week, each with seven weekday/day labels.
/// - `Week`: one bucket per month, labelled with the ISO week numbers whose
///   Monday falls inside that month and on the axis.
/// - `Month`: one bucket per year with the twelve month names.
pub fn build_headers(axis: &TimelineAxis, view: ViewMode) -> Vec<HeaderBucket> {
    match view {
        ViewMode::Day => day_headers(axis),
        ViewMode::Week => week_headers(axis),
        ViewMode::Month => month_headers(axis),
    }
}

fn day_headers(axis: &TimelineAxis) -> Vec<HeaderBucket> {
    let mut buckets = Vec::new();
    let mut week = axis.start;
    while week <= axis.end {
        let subs = (0..7)
            .map(|i| {
                let date = week + Duration::days(i);
                SubHeader {
                    label: date.format("%a %-d").to_string(),
                    date,
                }
            })
            .collect();
        buckets.push(HeaderBucket {
            label: week.format("Week of %b %-d, %Y").to_string(),
            start: week,
            subs,
        });
        week += Duration::days(7);
    }
    buckets
}

fn week_headers(axis: &TimelineAxis) -> Vec<HeaderBucket> {
    let mondays: Vec<NaiveDate> = std::iter::successors(Some(axis.start), |d| {
        Some(*d + Duration::days(7)).filter(|next| *next <= axis.end)
    })
    .collect();

    let mut buckets = Vec::new();
    let mut month = first_of_month(axis.start);
    while month <= axis.end {
        let subs = mondays
            .iter()
            .filter(|d| d.year() == month.year() && d.month() == month.month())
            .map(|&date| SubHeader {
                label: format!("W{}", date.iso_week().week()),
                date,
            })
            .collect();
        buckets.push(HeaderBucket {
            label: month.format("%B %Y").to_string(),
            start: month,
            subs,
        });
        month = add_months(month, 1);
    }
    buckets
}

fn month_headers(axis: &TimelineAxis) -> Vec<HeaderBucket> {
    (axis.start.year()..=axis.end.year())
        .filter_map(|year| {
            let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let subs = (1..=12)
                .filter_map(|m| NaiveDate::from_ymd_opt(year, m, 1))
                .map(|date| SubHeader {
                    label: date.format("%b").to_string(),
                    date,
                })
                .collect();
            Some(HeaderBucket {
                label: year.to_string(),
                start,
                subs,
            })
        })
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn axis(start: NaiveDate, end: NaiveDate) -> TimelineAxis {
        TimelineAxis { start, end }
    }

    #[test]
    fn day_view_has_a_bucket_per_week() {
        let buckets = build_headers(&axis(d(2025, 1, 6), d(2025, 1, 20)), ViewMode::Day);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].label, "Week of Jan 6, 2025");
        assert_eq!(buckets[0].subs.len(), 7);
        assert_eq!(buckets[0].subs[0].label, "Mon 6");
        assert_eq!(buckets[0].subs[6].label, "Sun 12");
        assert_eq!(buckets[2].start, d(2025, 1, 20));
    }

    #[test]
    fn week_view_groups_iso_weeks_by_month() {
        let buckets = build_headers(&axis(d(2024, 12, 23), d(2025, 2, 10)), ViewMode::Week);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["December 2024", "January 2025", "February 2025"]);

        let dec: Vec<&str> = buckets[0].subs.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(dec, vec!["W52", "W1"]);
        let jan: Vec<&str> = buckets[1].subs.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(jan, vec!["W2", "W3", "W4", "W5"]);
        let feb: Vec<&str> = buckets[2].subs.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(feb, vec!["W6", "W7"]);
    }

    #[test]
    fn month_view_has_a_bucket_per_year() {
        let buckets = build_headers(&axis(d(2024, 11, 4), d(2025, 3, 1)), ViewMode::Month);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "2024");
        assert_eq!(buckets[1].subs.len(), 12);
        assert_eq!(buckets[1].subs[0].label, "Jan");
        assert_eq!(buckets[1].subs[11].label, "Dec");
    }
}
