use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::ToSql;
use rusqlite::Connection;

use super::types::*;
use crate::db::repository::row_to_encounter;
use crate::db::{format_datetime, DatabaseError, DATE_FORMAT};
use crate::models::enums::AppointmentStatus;

/// Filter stage: the appointment predicate shared by every aggregation.
/// Renders against the `a` alias of `appointments`.
pub(super) struct AppointmentScope {
    clauses: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl AppointmentScope {
    pub(super) fn new(filter: &DashboardFilter) -> Self {
        let mut scope = Self {
            clauses: Vec::new(),
            params: Vec::new(),
        };

        scope.push("a.scheduled_at >= ?", format_datetime(&filter.window.since));
        scope.push("a.scheduled_at <= ?", format_datetime(&filter.window.until));
        if let Some(status) = &filter.status {
            scope.push("a.status = ?", status.as_str().to_string());
        }
        if let Some(provider_id) = filter.provider_id {
            scope.push("a.provider_id = ?", provider_id.to_string());
        }

        scope
    }

    fn push(&mut self, clause: &str, value: String) {
        self.params.push(Box::new(value));
        self.clauses
            .push(clause.replace('?', &format!("?{}", self.params.len())));
    }

    pub(super) fn where_sql(&self) -> String {
        self.clauses.join(" AND ")
    }

    pub(super) fn param_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

pub(super) fn count_by_status(
    conn: &Connection,
    scope: &AppointmentScope,
) -> Result<StatusCounts, DatabaseError> {
    let sql = format!(
        "SELECT a.status, COUNT(*) FROM appointments a WHERE {} GROUP BY a.status",
        scope.where_sql()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(scope.param_refs().as_slice(), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
    })?;

    let mut counts = StatusCounts::default();
    for row in rows {
        let (status, n) = row?;
        counts.total += n;
        match AppointmentStatus::from_str(&status)? {
            AppointmentStatus::Scheduled => counts.scheduled += n,
            AppointmentStatus::Completed => counts.completed += n,
            AppointmentStatus::NoShow => counts.no_show += n,
            AppointmentStatus::Cancelled => counts.cancelled += n,
        }
    }
    Ok(counts)
}

/// Minutes spent in every checked-out encounter attached to a scoped appointment.
pub(super) fn fetch_durations(
    conn: &Connection,
    scope: &AppointmentScope,
) -> Result<Vec<i64>, DatabaseError> {
    let sql = format!(
        "SELECT e.id, e.appointment_id, e.patient_id, e.provider_id,
                e.check_in, e.check_out, e.reason
         FROM encounters e
         JOIN appointments a ON e.appointment_id = a.id
         WHERE e.check_out IS NOT NULL AND {}",
        scope.where_sql()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(scope.param_refs().as_slice(), row_to_encounter)?;

    let mut durations = Vec::new();
    for row in rows {
        durations.extend(row?.duration_minutes());
    }
    Ok(durations)
}

pub(super) fn fetch_daily(
    conn: &Connection,
    scope: &AppointmentScope,
) -> Result<Vec<DailyCount>, DatabaseError> {
    let sql = format!(
        "SELECT date(a.scheduled_at) AS day, COUNT(*) AS cnt
         FROM appointments a
         WHERE {}
         GROUP BY day
         ORDER BY day ASC",
        scope.where_sql()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(scope.param_refs().as_slice(), |row| {
        Ok((row.get::<_, String>("day")?, row.get::<_, u32>("cnt")?))
    })?;

    let mut daily = Vec::new();
    for row in rows {
        let (day, count) = row?;
        let day = NaiveDate::parse_from_str(&day, DATE_FORMAT).map_err(|e| {
            DatabaseError::ConstraintViolation(format!("bad scheduled_at day {day}: {e}"))
        })?;
        daily.push(DailyCount { day, count });
    }
    Ok(daily)
}

pub(super) fn fetch_by_specialty(
    conn: &Connection,
    scope: &AppointmentScope,
) -> Result<Vec<SpecialtyCount>, DatabaseError> {
    let sql = format!(
        "SELECT p.specialty, COUNT(*) AS cnt
         FROM appointments a
         JOIN providers p ON a.provider_id = p.id
         WHERE {}
         GROUP BY p.specialty
         ORDER BY cnt DESC, p.specialty ASC",
        scope.where_sql()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(scope.param_refs().as_slice(), |row| {
        Ok(SpecialtyCount {
            specialty: row.get("specialty")?,
            count: row.get("cnt")?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Diagnoses attached to checked-out encounters of scoped appointments,
/// grouped by code.
pub(super) fn fetch_top_diagnoses(
    conn: &Connection,
    scope: &AppointmentScope,
    limit: usize,
) -> Result<Vec<DiagnosisCount>, DatabaseError> {
    let sql = format!(
        "SELECT d.code, MIN(d.description) AS description, COUNT(*) AS cnt
         FROM encounter_diagnoses ed
         JOIN diagnoses d ON d.id = ed.diagnosis_id
         JOIN encounters e ON e.id = ed.encounter_id
         JOIN appointments a ON a.id = e.appointment_id
         WHERE e.check_out IS NOT NULL AND {}
         GROUP BY d.code
         ORDER BY cnt DESC, d.code ASC
         LIMIT {limit}",
        scope.where_sql()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(scope.param_refs().as_slice(), |row| {
        Ok(DiagnosisCount {
            code: row.get("code")?,
            description: row.get("description")?,
            count: row.get("cnt")?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub(super) fn fetch_procedure_breakdown(
    conn: &Connection,
    scope: &AppointmentScope,
) -> Result<Vec<ProcedureCount>, DatabaseError> {
    let sql = format!(
        "SELECT pr.name, c.name AS category, COUNT(*) AS cnt
         FROM encounter_procedures ep
         JOIN procedures pr ON pr.id = ep.procedure_id
         JOIN procedure_categories c ON c.id = pr.category_id
         JOIN encounters e ON e.id = ep.encounter_id
         JOIN appointments a ON a.id = e.appointment_id
         WHERE e.check_out IS NOT NULL AND {}
         GROUP BY pr.name, c.name
         ORDER BY cnt DESC, pr.name ASC",
        scope.where_sql()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(scope.param_refs().as_slice(), |row| {
        Ok(ProcedureCount {
            name: row.get("name")?,
            category: row.get("category")?,
            count: row.get("cnt")?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Per-procedure price subtotals over every encounter-procedure attachment
/// of qualifying encounters. Each attachment row contributes its full price.
pub(super) fn fetch_revenue_rows(
    conn: &Connection,
    scope: &AppointmentScope,
) -> Result<Vec<f64>, DatabaseError> {
    let sql = format!(
        "SELECT pr.id, SUM(pr.price) AS subtotal
         FROM encounter_procedures ep
         JOIN procedures pr ON pr.id = ep.procedure_id
         JOIN encounters e ON e.id = ep.encounter_id
         JOIN appointments a ON a.id = e.appointment_id
         WHERE e.check_out IS NOT NULL AND {}
         GROUP BY pr.id",
        scope.where_sql()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(scope.param_refs().as_slice(), |row| {
        Ok(row.get::<_, Option<f64>>("subtotal")?.unwrap_or(0.0))
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
