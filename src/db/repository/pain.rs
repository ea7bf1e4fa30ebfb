use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{date_column, format_date, opt_uuid_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::PainAssessment;

const MAX_SCORE: u8 = 10;

pub fn insert_pain_assessment(conn: &Connection, pa: &PainAssessment) -> Result<(), DatabaseError> {
    if pa.score > MAX_SCORE {
        return Err(DatabaseError::Validation(format!(
            "pain score {} outside 0-{MAX_SCORE}",
            pa.score
        )));
    }
    conn.execute(
        "INSERT INTO pain_assessments (id, patient_id, encounter_id, recorded_at, score, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            pa.id.to_string(),
            pa.patient_id.to_string(),
            pa.encounter_id.map(|id| id.to_string()),
            format_date(&pa.recorded_at),
            pa.score,
            pa.notes,
        ],
    )?;
    Ok(())
}

/// Every assessment of a patient, oldest first.
pub fn get_pain_assessments_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<PainAssessment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, encounter_id, recorded_at, score, notes
         FROM pain_assessments WHERE patient_id = ?1
         ORDER BY recorded_at ASC, rowid ASC",
    )?;
    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok(PainAssessment {
            id: uuid_column(row, 0)?,
            patient_id: uuid_column(row, 1)?,
            encounter_id: opt_uuid_column(row, 2)?,
            recorded_at: date_column(row, 3)?,
            score: row.get(4)?,
            notes: row.get(5)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Scores recorded on or after `since`, oldest first.
pub fn get_pain_scores_since(
    conn: &Connection,
    patient_id: &Uuid,
    since: &NaiveDate,
) -> Result<Vec<u8>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT score FROM pain_assessments
         WHERE patient_id = ?1 AND recorded_at >= ?2
         ORDER BY recorded_at ASC, rowid ASC",
    )?;
    let rows = stmt.query_map(params![patient_id.to_string(), format_date(since)], |row| {
        row.get::<_, u8>(0)
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
