//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per aggregate. All public functions are re-exported here.
//! Ids are stored as UUID text, dates as `YYYY-MM-DD`, timestamps as
//! `YYYY-MM-DD HH:MM:SS` so text comparison in SQL is chronological.

mod appointment;
mod care_plan;
mod catalog;
mod encounter;
mod pain;
mod patient;
mod provider;

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use uuid::Uuid;

pub use appointment::*;
pub use care_plan::*;
pub use catalog::*;
pub use encounter::*;
pub use pain::*;
pub use patient::*;
pub use provider::*;

pub(crate) use care_plan::row_to_care_step;
pub(crate) use encounter::row_to_encounter;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_datetime(ts: &NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

pub(crate) fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn opt_uuid_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<Uuid>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| Uuid::parse_str(&s).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

pub(crate) fn date_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn opt_date_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<NaiveDate>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

pub(crate) fn datetime_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<NaiveDateTime> {
    let s: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn opt_datetime_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<NaiveDateTime>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| {
            NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(|e| conversion_error(idx, e))
        })
        .transpose()
}

pub(crate) fn enum_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = super::DatabaseError>,
{
    let s: String = row.get(idx)?;
    T::from_str(&s).map_err(|e| conversion_error(idx, e))
}
