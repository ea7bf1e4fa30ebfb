use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::AppointmentStatus;

/// Raw dashboard parameters as received from a form or command line.
/// Nothing here is trusted; see `resolve_filter`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub days: Option<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub status: Option<String>,
    pub provider: Option<String>,
}

/// Closed interval of `scheduled_at` timestamps covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub since: NaiveDateTime,
    pub until: NaiveDateTime,
}

/// Validated filter driving every dashboard stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardFilter {
    pub window: ReportWindow,
    /// Trailing-window length in effect (echoed even when an explicit range won).
    pub days: i64,
    /// True when the window came from explicit start/end dates.
    pub explicit_range: bool,
    pub status: Option<StatusFilter>,
    pub provider_id: Option<Uuid>,
    pub resolved_at: NaiveDateTime,
}

/// Status predicate. A value outside the enumeration is still applied and
/// matches no appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Is(AppointmentStatus),
    Unrecognized(String),
}

impl StatusFilter {
    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::Is(status) => status.as_str(),
            StatusFilter::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: u32,
    pub scheduled: u32,
    pub completed: u32,
    pub no_show: u32,
    pub cancelled: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyCount {
    pub specialty: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisCount {
    pub code: String,
    pub description: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureCount {
    pub name: String,
    pub category: String,
    pub count: u32,
}

/// Provider entry for the filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOption {
    pub id: Uuid,
    pub full_name: String,
}

/// Complete dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub filter: DashboardFilter,
    pub total: u32,
    pub completed: u32,
    pub no_show: u32,
    pub cancelled: u32,
    pub completion_rate: f64,
    pub no_show_rate: f64,
    pub avg_minutes: f64,
    pub daily: Vec<DailyCount>,
    pub by_specialty: Vec<SpecialtyCount>,
    pub top_diagnoses: Vec<DiagnosisCount>,
    pub procedures: Vec<ProcedureCount>,
    /// Sum of unit prices per encounter-procedure attachment, 2 decimals.
    pub revenue_total: f64,
    pub specialties: Vec<String>,
    pub providers: Vec<ProviderOption>,
}
