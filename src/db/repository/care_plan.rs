use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{date_column, enum_column, format_date, opt_date_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::enums::Protocol;
use crate::models::{CarePlan, CareStep};

const MAX_SCORE: u8 = 10;

pub fn insert_care_plan(conn: &Connection, plan: &CarePlan) -> Result<(), DatabaseError> {
    if plan.goal_pain_score > MAX_SCORE {
        return Err(DatabaseError::Validation(format!(
            "goal pain score {} outside 0-{MAX_SCORE}",
            plan.goal_pain_score
        )));
    }
    conn.execute(
        "INSERT INTO care_plans (id, patient_id, diagnosis, protocol, start_date, goal_pain_score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            plan.id.to_string(),
            plan.patient_id.to_string(),
            plan.diagnosis,
            plan.protocol.as_str(),
            format_date(&plan.start_date),
            plan.goal_pain_score,
        ],
    )?;
    Ok(())
}

/// All plans of one patient, most recent start first.
pub fn get_care_plans_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<CarePlan>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, diagnosis, protocol, start_date, goal_pain_score
         FROM care_plans WHERE patient_id = ?1
         ORDER BY start_date DESC, rowid ASC",
    )?;
    let rows = stmt.query_map(params![patient_id.to_string()], row_to_care_plan)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_care_plans_by_protocol(
    conn: &Connection,
    protocol: Protocol,
) -> Result<Vec<CarePlan>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, diagnosis, protocol, start_date, goal_pain_score
         FROM care_plans WHERE protocol = ?1
         ORDER BY rowid ASC",
    )?;
    let rows = stmt.query_map(params![protocol.as_str()], row_to_care_plan)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_care_plan(row: &rusqlite::Row) -> Result<CarePlan, rusqlite::Error> {
    Ok(CarePlan {
        id: uuid_column(row, 0)?,
        patient_id: uuid_column(row, 1)?,
        diagnosis: row.get(2)?,
        protocol: enum_column(row, 3)?,
        start_date: date_column(row, 4)?,
        goal_pain_score: row.get(5)?,
    })
}

/// Completion dates earlier than the scheduled date are stored as given.
pub fn insert_care_step(conn: &Connection, step: &CareStep) -> Result<(), DatabaseError> {
    if let Some(done) = step.done_at {
        if done < step.scheduled_at {
            tracing::warn!(
                step_id = %step.id,
                scheduled = %step.scheduled_at,
                done = %done,
                "Care step completed before its scheduled date"
            );
        }
    }
    conn.execute(
        "INSERT INTO care_steps (id, care_plan_id, procedure_id, scheduled_at, done_at, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            step.id.to_string(),
            step.care_plan_id.to_string(),
            step.procedure_id.to_string(),
            format_date(&step.scheduled_at),
            step.done_at.as_ref().map(format_date),
            step.notes,
        ],
    )?;
    Ok(())
}

pub fn get_care_steps_for_plan(
    conn: &Connection,
    care_plan_id: &Uuid,
) -> Result<Vec<CareStep>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, care_plan_id, procedure_id, scheduled_at, done_at, notes
         FROM care_steps WHERE care_plan_id = ?1
         ORDER BY scheduled_at ASC, rowid ASC",
    )?;
    let rows = stmt.query_map(params![care_plan_id.to_string()], row_to_care_step)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Maps `id, care_plan_id, procedure_id, scheduled_at, done_at, notes`.
pub(crate) fn row_to_care_step(row: &rusqlite::Row<'_>) -> rusqlite::Result<CareStep> {
    Ok(CareStep {
        id: uuid_column(row, 0)?,
        care_plan_id: uuid_column(row, 1)?,
        procedure_id: uuid_column(row, 2)?,
        scheduled_at: date_column(row, 3)?,
        done_at: opt_date_column(row, 4)?,
        notes: row.get(5)?,
    })
}
