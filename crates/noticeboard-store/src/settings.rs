use noticeboard_core::SchoolYear;
use rusqlite::{params, Connection, OptionalExtension};

use crate::StoreError;

pub const SETTING_SCHOOL_YEAR: &str = "school_year";

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    Ok(conn
        .query_row("SELECT v FROM settings WHERE k = ?1", [key], |row| row.get(0))
        .optional()?)
}

pub fn put_setting(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO settings (k, v) VALUES (?1, ?2) ON CONFLICT(k) DO UPDATE SET v = excluded.v",
        params![key, value],
    )?;
    Ok(())
}

/// Current school year as configured in the database, if set.
pub fn school_year(conn: &Connection) -> Result<Option<SchoolYear>, StoreError> {
    match get_setting(conn, SETTING_SCHOOL_YEAR)? {
        Some(raw) => SchoolYear::parse(&raw)
            .map(Some)
            .map_err(|e| StoreError(e.to_string())),
        None => Ok(None),
    }
}

pub fn set_school_year(conn: &Connection, year: SchoolYear) -> Result<(), StoreError> {
    put_setting(conn, SETTING_SCHOOL_YEAR, &year.label())
}
