use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;

use super::fetch::*;
use super::types::*;
use super::window::resolve_filter;
use crate::config::TOP_DIAGNOSES_LIMIT;
use crate::db::{list_providers, list_specialties, DatabaseError};
use crate::stats::{mean, percentage, round_to};

/// Headline figures derived from status counts and visit durations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub completion_rate: f64,
    pub no_show_rate: f64,
    pub avg_minutes: f64,
}

/// Reduce stage. Empty inputs yield zeros.
pub fn summarize(counts: &StatusCounts, durations: &[i64]) -> Summary {
    Summary {
        completion_rate: percentage(counts.completed, counts.total),
        no_show_rate: percentage(counts.no_show, counts.total),
        avg_minutes: mean(durations.iter().map(|&m| m as f64))
            .map(|m| round_to(m, 1))
            .unwrap_or(0.0),
    }
}

/// Revenue estimate from per-procedure subtotals, 2 decimals.
pub fn total_revenue(subtotals: &[f64]) -> f64 {
    round_to(subtotals.iter().sum(), 2)
}

/// Resolves `query` against the current local time and builds the dashboard.
pub fn get_dashboard_data(
    conn: &Connection,
    query: &DashboardQuery,
) -> Result<DashboardData, DatabaseError> {
    get_dashboard_data_at(conn, query, Local::now().naive_local())
}

/// Same as `get_dashboard_data` with an explicit "now".
pub fn get_dashboard_data_at(
    conn: &Connection,
    query: &DashboardQuery,
    now: NaiveDateTime,
) -> Result<DashboardData, DatabaseError> {
    let filter = resolve_filter(query, now);
    compute_dashboard(conn, filter)
}

/// Runs every aggregation stage for an already-resolved filter.
pub fn compute_dashboard(
    conn: &Connection,
    filter: DashboardFilter,
) -> Result<DashboardData, DatabaseError> {
    let scope = AppointmentScope::new(&filter);

    let counts = count_by_status(conn, &scope)?;
    let durations = fetch_durations(conn, &scope)?;
    let summary = summarize(&counts, &durations);

    let daily = fetch_daily(conn, &scope)?;
    let by_specialty = fetch_by_specialty(conn, &scope)?;
    let top_diagnoses = fetch_top_diagnoses(conn, &scope, TOP_DIAGNOSES_LIMIT)?;
    let procedures = fetch_procedure_breakdown(conn, &scope)?;
    let revenue_total = total_revenue(&fetch_revenue_rows(conn, &scope)?);

    let specialties = list_specialties(conn)?;
    let providers = list_providers(conn)?
        .into_iter()
        .map(|p| ProviderOption {
            id: p.id,
            full_name: p.full_name,
        })
        .collect();

    tracing::debug!(
        total = counts.total,
        days = daily.len(),
        encounters = durations.len(),
        "Dashboard computed"
    );

    Ok(DashboardData {
        filter,
        total: counts.total,
        completed: counts.completed,
        no_show: counts.no_show,
        cancelled: counts.cancelled,
        completion_rate: summary.completion_rate,
        no_show_rate: summary.no_show_rate,
        avg_minutes: summary.avg_minutes,
        daily,
        by_specialty,
        top_diagnoses,
        procedures,
        revenue_total,
        specialties,
        providers,
    })
}
