//! Year paging for the contribution calendar.
//!
//! Offset 0 is the newest permitted window; going back is bounded by the oldest
//! fetched sample. A failed guard is a no-op, never an error.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::contributions::calendar::compute_window;
use crate::models::contribution::{CalendarWindow, ContributionSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Backward,
    Forward,
}

pub fn oldest_sample(samples: &[ContributionSample]) -> Option<NaiveDate> {
    samples.iter().map(|s| s.date).min()
}

/// True when some fetched sample predates the window start.
pub fn can_go_back(samples: &[ContributionSample], window: &CalendarWindow) -> bool {
    oldest_sample(samples).is_some_and(|oldest| oldest < window.start)
}

pub fn can_go_forward(offset: i32) -> bool {
    offset < 0
}

/// Returns the offset after moving one year in `direction`, or `offset`
/// unchanged when the move is not allowed.
pub fn navigate(
    offset: i32,
    direction: Direction,
    samples: &[ContributionSample],
    now: DateTime<Utc>,
) -> i32 {
    match direction {
        Direction::Backward => {
            let window = compute_window(offset, now);
            if can_go_back(samples, &window) {
                offset - 1
            } else {
                offset
            }
        }
        Direction::Forward => {
            if can_go_forward(offset) {
                offset + 1
            } else {
                offset
            }
        }
    }
}
