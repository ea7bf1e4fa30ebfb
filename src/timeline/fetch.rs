use rusqlite::{params, Connection};
use uuid::Uuid;

use super::types::*;
use crate::db::repository::row_to_care_step;
use crate::db::{get_pain_assessments_for_patient, DatabaseError};

pub(super) fn fetch_pain_points(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<PainPoint>, DatabaseError> {
    Ok(get_pain_assessments_for_patient(conn, patient_id)?
        .into_iter()
        .map(|pa| PainPoint {
            date: pa.recorded_at,
            score: pa.score,
        })
        .collect())
}

/// Care steps across every plan of the patient, in scheduled order.
pub(super) fn fetch_step_points(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<StepPoint>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT cs.id, cs.care_plan_id, cs.procedure_id, cs.scheduled_at, cs.done_at,
                cs.notes, pr.name
         FROM care_steps cs
         JOIN care_plans cp ON cp.id = cs.care_plan_id
         JOIN procedures pr ON pr.id = cs.procedure_id
         WHERE cp.patient_id = ?1
         ORDER BY cs.scheduled_at ASC, cs.rowid ASC",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        let step = row_to_care_step(row)?;
        Ok(StepPoint {
            date: step.effective_date(),
            procedure: row.get(6)?,
            done: step.done_at.is_some(),
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
