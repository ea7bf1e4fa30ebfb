use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::uuid_column;
use crate::db::DatabaseError;
use crate::models::Provider;

pub fn insert_provider(conn: &Connection, provider: &Provider) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO providers (id, full_name, crm, specialty) VALUES (?1, ?2, ?3, ?4)",
        params![
            provider.id.to_string(),
            provider.full_name,
            provider.crm,
            provider.specialty,
        ],
    )?;
    Ok(())
}

pub fn get_provider(conn: &Connection, id: &Uuid) -> Result<Option<Provider>, DatabaseError> {
    conn.query_row(
        "SELECT id, full_name, crm, specialty FROM providers WHERE id = ?1",
        params![id.to_string()],
        row_to_provider,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// All providers ordered by name (filter dropdown).
pub fn list_providers(conn: &Connection) -> Result<Vec<Provider>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, full_name, crm, specialty FROM providers ORDER BY full_name ASC",
    )?;
    let rows = stmt.query_map([], row_to_provider)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Distinct specialties in use, alphabetically.
pub fn list_specialties(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT DISTINCT specialty FROM providers ORDER BY specialty ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_provider(row: &rusqlite::Row) -> Result<Provider, rusqlite::Error> {
    Ok(Provider {
        id: uuid_column(row, 0)?,
        full_name: row.get(1)?,
        crm: row.get(2)?,
        specialty: row.get(3)?,
    })
}
