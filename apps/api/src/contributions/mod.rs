// Contribution calendar: sample fetching, week bucketing, and year paging.

pub mod calendar;
pub mod fetcher;
pub mod handlers;
pub mod navigation;
