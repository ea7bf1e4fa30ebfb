use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{
    datetime_column, enum_column, format_date, format_datetime, opt_date_column, uuid_column,
};
use crate::db::DatabaseError;
use crate::models::Patient;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, full_name, sex, birth_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient.id.to_string(),
            patient.full_name,
            patient.sex.as_str(),
            patient.birth_date.as_ref().map(format_date),
            format_datetime(&patient.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    conn.query_row(
        "SELECT id, full_name, sex, birth_date, created_at FROM patients WHERE id = ?1",
        params![id.to_string()],
        row_to_patient,
    )
    .optional()
    .map_err(DatabaseError::from)
}

fn row_to_patient(row: &rusqlite::Row) -> Result<Patient, rusqlite::Error> {
    Ok(Patient {
        id: uuid_column(row, 0)?,
        full_name: row.get(1)?,
        sex: enum_column(row, 2)?,
        birth_date: opt_date_column(row, 3)?,
        created_at: datetime_column(row, 4)?,
    })
}
