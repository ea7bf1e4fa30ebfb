use rusqlite::{params, Connection, OptionalExtension};

use super::uuid_column;
use crate::db::DatabaseError;
use crate::models::{Diagnosis, Procedure, ProcedureCategory};

pub fn insert_diagnosis(conn: &Connection, diag: &Diagnosis) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO diagnoses (id, code, description) VALUES (?1, ?2, ?3)",
        params![diag.id.to_string(), diag.code, diag.description],
    )?;
    Ok(())
}

pub fn insert_procedure_category(
    conn: &Connection,
    category: &ProcedureCategory,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO procedure_categories (id, name) VALUES (?1, ?2)",
        params![category.id.to_string(), category.name],
    )?;
    Ok(())
}

pub fn insert_procedure(conn: &Connection, proc: &Procedure) -> Result<(), DatabaseError> {
    if proc.price < 0.0 {
        return Err(DatabaseError::Validation(format!(
            "procedure {} has negative price {}",
            proc.code, proc.price
        )));
    }
    conn.execute(
        "INSERT INTO procedures (id, code, name, category_id, duration_estimate_min,
         requires_image_guidance, price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            proc.id.to_string(),
            proc.code,
            proc.name,
            proc.category_id.to_string(),
            proc.duration_estimate_min,
            proc.requires_image_guidance as i32,
            proc.price,
        ],
    )?;
    Ok(())
}

pub fn get_procedure_by_code(
    conn: &Connection,
    code: &str,
) -> Result<Option<Procedure>, DatabaseError> {
    conn.query_row(
        "SELECT id, code, name, category_id, duration_estimate_min, requires_image_guidance, price
         FROM procedures WHERE code = ?1",
        params![code],
        |row| {
            Ok(Procedure {
                id: uuid_column(row, 0)?,
                code: row.get(1)?,
                name: row.get(2)?,
                category_id: uuid_column(row, 3)?,
                duration_estimate_min: row.get(4)?,
                requires_image_guidance: row.get::<_, i32>(5)? != 0,
                price: row.get(6)?,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}
