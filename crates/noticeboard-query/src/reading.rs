// SPDX-License-Identifier: Apache-2.0

//! What is still unread, per class and per recipient.

use noticeboard_core::{ClassId, UserId};
use noticeboard_model::Document;
use noticeboard_store::{document_from_row, DOCUMENT_COLUMNS};
use rusqlite::Connection;

use crate::QueryError;

const CLASS_UNREAD_FILTER: &str = "FROM class_acks ca
     JOIN documents d ON d.id = ca.document_id
     WHERE ca.class_id = ?1 AND ca.read_at IS NULL AND d.published = 1";

pub fn unread_count_for_class(conn: &Connection, class: ClassId) -> Result<u64, QueryError> {
    let sql = format!("SELECT COUNT(*) {CLASS_UNREAD_FILTER}");
    Ok(conn.query_row(&sql, [class.get()], |row| row.get(0))?)
}

/// Circulars still to be read to `class`, oldest first.
pub fn unread_for_class(conn: &Connection, class: ClassId) -> Result<Vec<Document>, QueryError> {
    let sql = format!(
        "SELECT {DOCUMENT_COLUMNS} {CLASS_UNREAD_FILTER} ORDER BY d.date ASC, d.number ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([class.get()], document_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn unread_count_for_user(conn: &Connection, user: UserId) -> Result<u64, QueryError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM recipient_acks ra
         JOIN documents d ON d.id = ra.document_id
         WHERE ra.user_id = ?1 AND ra.read_at IS NULL AND d.published = 1",
        [user.get()],
        |row| row.get(0),
    )?)
}
