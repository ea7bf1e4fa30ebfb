use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{datetime_column, enum_column, format_datetime, uuid_column};
use crate::db::DatabaseError;
use crate::models::enums::AppointmentStatus;
use crate::models::Appointment;

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, provider_id, scheduled_at, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.provider_id.to_string(),
            format_datetime(&appt.scheduled_at),
            appt.status.as_str(),
            format_datetime(&appt.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    conn.query_row(
        "SELECT id, patient_id, provider_id, scheduled_at, status, created_at
         FROM appointments WHERE id = ?1",
        params![id.to_string()],
        |row| {
            Ok(Appointment {
                id: uuid_column(row, 0)?,
                patient_id: uuid_column(row, 1)?,
                provider_id: uuid_column(row, 2)?,
                scheduled_at: datetime_column(row, 3)?,
                status: enum_column(row, 4)?,
                created_at: datetime_column(row, 5)?,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Record the real-world outcome of an appointment.
pub fn update_appointment_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id.to_string()],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
