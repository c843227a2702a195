use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Level value marking a cell that lies outside the displayed window.
pub const OUT_OF_RANGE_LEVEL: i8 = -1;

/// One (date, count, level) record from the contribution source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSample {
    pub date: NaiveDate,
    pub count: u32,
    pub level: i8,
}

/// Wire shape returned by the contribution source.
#[derive(Debug, Deserialize)]
pub struct ContributionsPayload {
    pub contributions: Vec<ContributionSample>,
}

/// The one-year range currently displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl CalendarWindow {
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: i8,
}

impl DayCell {
    pub fn is_in_range(&self) -> bool {
        self.level != OUT_OF_RANGE_LEVEL
    }
}

/// Sunday-to-Saturday group of exactly seven cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabelPosition {
    pub label: &'static str,
    pub week_index: usize,
}
