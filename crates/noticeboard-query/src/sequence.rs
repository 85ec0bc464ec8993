// SPDX-License-Identifier: Apache-2.0

use noticeboard_core::{DocumentId, SchoolYear};
use rusqlite::{params, Connection};

use crate::QueryError;

/// Next circular number: one past the highest number issued on the most
/// recent date that carries a numbered circular. Earlier dates are ignored,
/// so a same-day batch continues its own run.
pub fn next_sequence_number(conn: &Connection) -> Result<u32, QueryError> {
    let max: Option<u32> = conn.query_row(
        "SELECT MAX(number) FROM documents
         WHERE number IS NOT NULL
           AND date = (SELECT MAX(date) FROM documents WHERE number IS NOT NULL)",
        [],
        |row| row.get(0),
    )?;
    Ok(max.unwrap_or(0) + 1)
}

/// True when no other circular dated inside `school_year` uses `number`.
/// `exclude` is the circular being edited, which may keep its own number.
pub fn is_sequence_number_available(
    conn: &Connection,
    number: u32,
    exclude: Option<DocumentId>,
    school_year: SchoolYear,
) -> Result<bool, QueryError> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS (
           SELECT 1 FROM documents
           WHERE number = ?1 AND date BETWEEN ?2 AND ?3 AND (?4 IS NULL OR id != ?4)
         )",
        params![
            number,
            school_year.first_day(),
            school_year.last_day(),
            exclude.map(DocumentId::get)
        ],
        |row| row.get(0),
    )?;
    Ok(!taken)
}
