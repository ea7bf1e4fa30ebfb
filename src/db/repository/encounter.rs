use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{datetime_column, format_datetime, opt_datetime_column, opt_uuid_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::{Encounter, Vitals};

fn validate_check_out(
    check_in: &NaiveDateTime,
    check_out: &NaiveDateTime,
) -> Result<(), DatabaseError> {
    if check_out < check_in {
        return Err(DatabaseError::Validation(format!(
            "check-out {} precedes check-in {}",
            format_datetime(check_out),
            format_datetime(check_in)
        )));
    }
    Ok(())
}

pub fn insert_encounter(conn: &Connection, enc: &Encounter) -> Result<(), DatabaseError> {
    if let Some(ref out) = enc.check_out {
        validate_check_out(&enc.check_in, out)?;
    }
    conn.execute(
        "INSERT INTO encounters
             (id, appointment_id, patient_id, provider_id, check_in, check_out, reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            enc.id.to_string(),
            enc.appointment_id.map(|id| id.to_string()),
            enc.patient_id.to_string(),
            enc.provider_id.to_string(),
            format_datetime(&enc.check_in),
            enc.check_out.as_ref().map(format_datetime),
            enc.reason,
        ],
    )?;
    Ok(())
}

pub fn get_encounter(conn: &Connection, id: &Uuid) -> Result<Option<Encounter>, DatabaseError> {
    conn.query_row(
        "SELECT id, appointment_id, patient_id, provider_id, check_in, check_out, reason
         FROM encounters WHERE id = ?1",
        params![id.to_string()],
        row_to_encounter,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Maps `id, appointment_id, patient_id, provider_id, check_in, check_out,
/// reason` in that column order.
pub(crate) fn row_to_encounter(row: &rusqlite::Row<'_>) -> rusqlite::Result<Encounter> {
    Ok(Encounter {
        id: uuid_column(row, 0)?,
        appointment_id: opt_uuid_column(row, 1)?,
        patient_id: uuid_column(row, 2)?,
        provider_id: uuid_column(row, 3)?,
        check_in: datetime_column(row, 4)?,
        check_out: opt_datetime_column(row, 5)?,
        reason: row.get(6)?,
    })
}

/// Close an open encounter.
pub fn set_encounter_check_out(
    conn: &Connection,
    id: &Uuid,
    check_out: &NaiveDateTime,
) -> Result<(), DatabaseError> {
    let enc = get_encounter(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "encounter".into(),
        id: id.to_string(),
    })?;
    validate_check_out(&enc.check_in, check_out)?;
    conn.execute(
        "UPDATE encounters SET check_out = ?1 WHERE id = ?2",
        params![format_datetime(check_out), id.to_string()],
    )?;
    Ok(())
}

pub fn link_encounter_diagnosis(
    conn: &Connection,
    encounter_id: &Uuid,
    diagnosis_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO encounter_diagnoses (encounter_id, diagnosis_id) VALUES (?1, ?2)",
        params![encounter_id.to_string(), diagnosis_id.to_string()],
    )?;
    Ok(())
}

pub fn link_encounter_procedure(
    conn: &Connection,
    encounter_id: &Uuid,
    procedure_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO encounter_procedures (encounter_id, procedure_id) VALUES (?1, ?2)",
        params![encounter_id.to_string(), procedure_id.to_string()],
    )?;
    Ok(())
}

pub fn get_encounter_diagnosis_ids(
    conn: &Connection,
    encounter_id: &Uuid,
) -> Result<Vec<Uuid>, DatabaseError> {
    linked_ids(
        conn,
        "SELECT diagnosis_id FROM encounter_diagnoses WHERE encounter_id = ?1 ORDER BY rowid",
        encounter_id,
    )
}

pub fn get_encounter_procedure_ids(
    conn: &Connection,
    encounter_id: &Uuid,
) -> Result<Vec<Uuid>, DatabaseError> {
    linked_ids(
        conn,
        "SELECT procedure_id FROM encounter_procedures WHERE encounter_id = ?1 ORDER BY rowid",
        encounter_id,
    )
}

fn linked_ids(
    conn: &Connection,
    sql: &str,
    encounter_id: &Uuid,
) -> Result<Vec<Uuid>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![encounter_id.to_string()], |row| uuid_column(row, 0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn insert_vitals(conn: &Connection, vitals: &Vitals) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO vitals
             (id, encounter_id, height_cm, weight_kg, systolic, diastolic, heart_rate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            vitals.id.to_string(),
            vitals.encounter_id.to_string(),
            vitals.height_cm,
            vitals.weight_kg,
            vitals.systolic,
            vitals.diastolic,
            vitals.heart_rate,
        ],
    )?;
    Ok(())
}

pub fn get_vitals_for_encounter(
    conn: &Connection,
    encounter_id: &Uuid,
) -> Result<Option<Vitals>, DatabaseError> {
    conn.query_row(
        "SELECT id, encounter_id, height_cm, weight_kg, systolic, diastolic, heart_rate
         FROM vitals WHERE encounter_id = ?1",
        params![encounter_id.to_string()],
        |row| {
            Ok(Vitals {
                id: uuid_column(row, 0)?,
                encounter_id: uuid_column(row, 1)?,
                height_cm: row.get(2)?,
                weight_kg: row.get(3)?,
                systolic: row.get(4)?,
                diastolic: row.get(5)?,
                heart_rate: row.get(6)?,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}
