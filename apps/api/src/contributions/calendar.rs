//! Contribution calendar: turns a flat sample set plus a year offset into a
//! week-aligned grid, a total, and month-label placements.
//!
//! All dates are calendar days in UTC. Every function here is pure: the same
//! (offset, now, samples) always yields the same view.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::Serialize;

use crate::contributions::navigation;
use crate::models::contribution::{
    CalendarWindow, ContributionSample, DayCell, MonthLabelPosition, WeekBucket,
    OUT_OF_RANGE_LEVEL,
};

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Samples keyed by date. Duplicate dates keep the last sample seen.
pub type SampleMap = HashMap<NaiveDate, ContributionSample>;

pub fn sample_map(samples: &[ContributionSample]) -> SampleMap {
    samples.iter().map(|s| (s.date, s.clone())).collect()
}

/// Week grid for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekGrid {
    pub weeks: Vec<WeekBucket>,
    pub total: u64,
}

/// Computes the displayed range for `offset` years relative to `now`.
///
/// `end` is today shifted by `offset` years; `start` is one year before `end`,
/// advanced by one day. Feb 29 clamps to Feb 28 in non-leap years.
pub fn compute_window(offset: i32, now: DateTime<Utc>) -> CalendarWindow {
    let end = shift_years(now.date_naive(), offset);
    let one_year_back = shift_years(end, -1);
    let start = one_year_back
        .checked_add_days(Days::new(1))
        .unwrap_or(one_year_back);

    let label = format!(
        "{} {} — {} {}",
        MONTHS[start.month0() as usize],
        short_year(start),
        MONTHS[end.month0() as usize],
        short_year(end),
    );

    CalendarWindow { start, end, label }
}

fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let months = Months::new(years.unsigned_abs().saturating_mul(12));
    if years >= 0 {
        date.checked_add_months(months).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_months(months).unwrap_or(NaiveDate::MIN)
    }
}

fn short_year(date: NaiveDate) -> String {
    format!("{:02}", date.year().rem_euclid(100))
}

/// Buckets the window into Sunday-start weeks.
///
/// The first week starts on the Sunday on or before `window.start`; weeks are
/// emitted until one covers `window.end`. Cells outside the window carry
/// `OUT_OF_RANGE_LEVEL` and never count toward `total`.
pub fn build_weeks(window: &CalendarWindow, samples: &SampleMap) -> WeekGrid {
    let lead = u64::from(window.start.weekday().num_days_from_sunday());
    let first_sunday = window
        .start
        .checked_sub_days(Days::new(lead))
        .unwrap_or(window.start);

    let span = (window.end - first_sunday).num_days().max(0) as usize;
    let week_count = span / 7 + 1;

    let mut total = 0_u64;
    let mut weeks = Vec::with_capacity(week_count);
    let mut days_iter = first_sunday.iter_days();

    for _ in 0..week_count {
        let days: Vec<DayCell> = days_iter
            .by_ref()
            .take(7)
            .map(|date| match samples.get(&date) {
                Some(sample) if window.contains(date) => {
                    total += u64::from(sample.count);
                    DayCell {
                        date,
                        count: sample.count,
                        level: sample.level,
                    }
                }
                _ => DayCell {
                    date,
                    count: 0,
                    level: OUT_OF_RANGE_LEVEL,
                },
            })
            .collect();
        weeks.push(WeekBucket { days });
    }

    WeekGrid { weeks, total }
}

/// Records the week index of every month transition, using each week's first
/// in-range cell (or its first cell when none are in range).
pub fn derive_month_labels(weeks: &[WeekBucket]) -> Vec<MonthLabelPosition> {
    let mut positions = Vec::new();
    let mut last_month: Option<u32> = None;

    for (week_index, week) in weeks.iter().enumerate() {
        let Some(anchor) = week
            .days
            .iter()
            .find(|d| d.is_in_range())
            .or_else(|| week.days.first())
        else {
            continue;
        };

        let month = anchor.date.month0();
        if last_month != Some(month) {
            positions.push(MonthLabelPosition {
                label: MONTHS[month as usize],
                week_index,
            });
            last_month = Some(month);
        }
    }

    positions
}

/// Render-ready calendar returned to the front-end.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub username: String,
    pub offset: i32,
    pub window: CalendarWindow,
    pub weeks: Vec<WeekBucket>,
    pub total: u64,
    pub month_labels: Vec<MonthLabelPosition>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// Set when the sample fetch failed and the grid is rendered empty.
    pub notice: Option<String>,
}

impl CalendarView {
    pub fn build(
        username: &str,
        offset: i32,
        now: DateTime<Utc>,
        samples: &[ContributionSample],
        notice: Option<String>,
    ) -> Self {
        let window = compute_window(offset, now);
        let grid = build_weeks(&window, &sample_map(samples));
        let month_labels = derive_month_labels(&grid.weeks);

        Self {
            username: username.to_string(),
            offset,
            can_go_back: navigation::can_go_back(samples, &window),
            can_go_forward: navigation::can_go_forward(offset),
            window,
            weeks: grid.weeks,
            total: grid.total,
            month_labels,
            notice,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
