use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::types::*;
use crate::config::DEFAULT_WINDOW_DAYS;
use crate::db::DATE_FORMAT;
use crate::models::enums::AppointmentStatus;

/// Upper bound on the trailing window (about a century).
const MAX_WINDOW_DAYS: i64 = 36_500;

/// Turns raw caller parameters into a usable filter. Malformed values never
/// fail the request: they are logged and replaced by their defaults.
pub fn resolve_filter(query: &DashboardQuery, now: NaiveDateTime) -> DashboardFilter {
    let days = resolve_days(query.days);

    let (window, explicit_range) =
        match explicit_window(query.start.as_deref(), query.end.as_deref()) {
            Some(window) => (window, true),
            None => (trailing_window(now, days), false),
        };

    DashboardFilter {
        window,
        days,
        explicit_range,
        status: non_empty(query.status.as_deref()).map(parse_status),
        provider_id: non_empty(query.provider.as_deref()).and_then(parse_provider),
        resolved_at: now,
    }
}

/// [start 00:00:00, end 23:59:59] when both dates are present and valid.
pub fn explicit_window(start: Option<&str>, end: Option<&str>) -> Option<ReportWindow> {
    let start = non_empty(start).map(|s| parse_day("start", s));
    let end = non_empty(end).map(|s| parse_day("end", s));

    match (start, end) {
        (Some(Some(start)), Some(Some(end))) => Some(ReportWindow {
            since: start.and_hms_opt(0, 0, 0)?,
            until: end.and_hms_opt(23, 59, 59)?,
        }),
        (Some(_), None) | (None, Some(_)) => {
            tracing::debug!("Only one bound of the date range given, using trailing window");
            None
        }
        _ => None,
    }
}

/// [now − days, now].
pub fn trailing_window(now: NaiveDateTime, days: i64) -> ReportWindow {
    ReportWindow {
        since: now - Duration::days(days),
        until: now,
    }
}

fn resolve_days(days: Option<i64>) -> i64 {
    match days {
        None => DEFAULT_WINDOW_DAYS,
        Some(d) if d < 0 => {
            tracing::warn!(days = d, "Negative window length, using default");
            DEFAULT_WINDOW_DAYS
        }
        Some(d) if d > MAX_WINDOW_DAYS => {
            tracing::warn!(days = d, max = MAX_WINDOW_DAYS, "Window length clamped");
            MAX_WINDOW_DAYS
        }
        Some(d) => d,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_day(field: &str, raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(day) => Some(day),
        Err(e) => {
            tracing::warn!(field, value = raw, error = %e, "Unparseable date filter ignored");
            None
        }
    }
}

fn parse_status(raw: &str) -> StatusFilter {
    match AppointmentStatus::from_str(raw) {
        Ok(status) => StatusFilter::Is(status),
        Err(e) => {
            tracing::warn!(error = %e, "Unknown status filter matches no appointment");
            StatusFilter::Unrecognized(raw.to_string())
        }
    }
}

fn parse_provider(raw: &str) -> Option<Uuid> {
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(value = raw, error = %e, "Unparseable provider filter ignored");
            None
        }
    }
}
