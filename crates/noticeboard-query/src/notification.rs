// SPDX-License-Identifier: Apache-2.0

use noticeboard_core::{DocumentId, UserId};
use rusqlite::Connection;

use crate::QueryError;

/// Recipients of a published circular who have not confirmed it yet,
/// ordered by user id. Drafts and unknown ids yield an empty list.
pub fn pending_recipients(conn: &Connection, document: DocumentId) -> Result<Vec<UserId>, QueryError> {
    let mut stmt = conn.prepare_cached(
        "SELECT ra.user_id FROM recipient_acks ra
         JOIN documents d ON d.id = ra.document_id
         WHERE ra.document_id = ?1 AND d.published = 1 AND ra.confirmed_at IS NULL
         ORDER BY ra.user_id ASC",
    )?;
    let ids = stmt
        .query_map([document.get()], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    ids.into_iter()
        .map(|id| UserId::new(id).map_err(QueryError::from))
        .collect()
}
