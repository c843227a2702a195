//! Axum route handlers for the Contributions API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::contributions::calendar::CalendarView;
use crate::contributions::fetcher::FetchOutcome;
use crate::contributions::navigation::{navigate, Direction};
use crate::errors::AppError;
use crate::models::contribution::ContributionSample;
use crate::state::AppState;

/// Furthest year offset a caller may request.
const MIN_OFFSET: i32 = -50;
const MAX_USERNAME_LEN: usize = 39;

#[derive(Debug, Deserialize)]
pub struct OffsetQuery {
    #[serde(default)]
    pub offset: i32,
}

#[derive(Debug, Deserialize)]
pub struct NavigateQuery {
    #[serde(default)]
    pub offset: i32,
    pub direction: Direction,
}

/// GET /api/v1/contributions
///
/// Calendar for the configured default username.
pub async fn handle_default_calendar(
    State(state): State<AppState>,
    Query(query): Query<OffsetQuery>,
) -> Result<Json<CalendarView>, AppError> {
    let username = state.config.github_username.clone();
    render_calendar(&state, &username, query.offset).await
}

/// GET /api/v1/contributions/:username
pub async fn handle_calendar(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<OffsetQuery>,
) -> Result<Json<CalendarView>, AppError> {
    render_calendar(&state, &username, query.offset).await
}

/// GET /api/v1/contributions/:username/navigate
///
/// Moves one year from `offset` in `direction`. A move the bounds forbid
/// returns the calendar at the unchanged offset.
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<NavigateQuery>,
) -> Result<Json<CalendarView>, AppError> {
    validate_username(&username)?;
    let offset = normalize_offset(query.offset)?;

    let outcome = state.contributions.samples_for(&username).await;
    let now = Utc::now();
    let next = step(offset, query.direction, &outcome.samples, now);

    Ok(Json(build_view(&username, next, now, &outcome)))
}

async fn render_calendar(
    state: &AppState,
    username: &str,
    offset: i32,
) -> Result<Json<CalendarView>, AppError> {
    validate_username(username)?;
    let offset = normalize_offset(offset)?;

    let outcome = state.contributions.samples_for(username).await;
    Ok(Json(build_view(username, offset, Utc::now(), &outcome)))
}

/// Navigation that never leaves the accepted offset range.
fn step(
    offset: i32,
    direction: Direction,
    samples: &[ContributionSample],
    now: DateTime<Utc>,
) -> i32 {
    navigate(offset, direction, samples, now).max(MIN_OFFSET)
}

/// Calendar view with backward navigation disabled at `MIN_OFFSET`.
fn build_view(
    username: &str,
    offset: i32,
    now: DateTime<Utc>,
    outcome: &FetchOutcome,
) -> CalendarView {
    let mut view = CalendarView::build(
        username,
        offset,
        now,
        &outcome.samples,
        outcome.notice.clone(),
    );
    view.can_go_back &= offset > MIN_OFFSET;
    view
}

/// Positive offsets clamp to the present window.
fn normalize_offset(offset: i32) -> Result<i32, AppError> {
    if offset < MIN_OFFSET {
        return Err(AppError::Validation(format!(
            "offset must be at least {MIN_OFFSET}"
        )));
    }
    Ok(offset.min(0))
}

/// GitHub usernames: 1-39 ASCII alphanumerics or hyphens, no leading/trailing hyphen.
fn validate_username(username: &str) -> Result<(), AppError> {
    let valid = !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !username.starts_with('-')
        && !username.ends_with('-');

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "'{username}' is not a valid GitHub username"
        )))
    }
}
