// SPDX-License-Identifier: Apache-2.0

//! Acknowledgment state transitions.
//!
//! Each update carries its own `IS NULL` guard, so the row count of the
//! update is the compare-and-set outcome: a concurrent second writer
//! matches nothing and reports no change instead of overwriting.

use noticeboard_core::{ClassId, Clock, DocumentId, UserId};
use noticeboard_model::Document;
use noticeboard_store::{document_from_row, DOCUMENT_COLUMNS};
use rusqlite::{params, Connection, TransactionBehavior};
use tracing::{debug, info};

use crate::QueryError;

/// Records a recipient's explicit confirmation, setting `read_at` and
/// `confirmed_at` to the same instant.
///
/// Returns `false` without touching anything when the user is not a
/// recipient or has already confirmed.
pub fn acknowledge_as_individual(
    conn: &Connection,
    document: DocumentId,
    user: UserId,
    clock: &dyn Clock,
) -> Result<bool, QueryError> {
    let now = clock.now();
    let changed = conn.execute(
        "UPDATE recipient_acks SET read_at = ?3, confirmed_at = ?3
         WHERE document_id = ?1 AND user_id = ?2 AND confirmed_at IS NULL",
        params![document.get(), user.get(), now],
    )?;
    let confirmed = changed == 1;
    if confirmed {
        info!(document = %document, user = %user, "circular confirmed");
    } else {
        debug!(document = %document, user = %user, "confirmation ignored");
    }
    Ok(confirmed)
}

/// Records that the recipient was shown the circular. Leaves an existing
/// read time and any confirmation alone.
pub fn mark_read(
    conn: &Connection,
    document: DocumentId,
    user: UserId,
    clock: &dyn Clock,
) -> Result<bool, QueryError> {
    let changed = conn.execute(
        "UPDATE recipient_acks SET read_at = ?3
         WHERE document_id = ?1 AND user_id = ?2 AND read_at IS NULL",
        params![document.get(), user.get(), clock.now()],
    )?;
    Ok(changed == 1)
}

/// Marks published circulars as read to `class` by its representative.
///
/// With `document` set only that circular is considered. Candidates are
/// processed oldest number first and returned in that order. The batch runs
/// in one transaction: on error no mark from this call survives.
pub fn acknowledge_as_class_representative(
    conn: &mut Connection,
    class: ClassId,
    document: Option<DocumentId>,
    clock: &dyn Clock,
) -> Result<Vec<Document>, QueryError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let candidates = {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM class_acks ca
             JOIN documents d ON d.id = ca.document_id
             WHERE ca.class_id = ?1 AND ca.read_at IS NULL AND d.published = 1
               AND (?2 IS NULL OR d.id = ?2)
             ORDER BY d.number ASC, d.id ASC"
        );
        let mut stmt = tx.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![class.get(), document.map(DocumentId::get)],
                document_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    let now = clock.now();
    let mut acknowledged = Vec::with_capacity(candidates.len());
    {
        let mut stmt = tx.prepare(
            "UPDATE class_acks SET read_at = ?3
             WHERE document_id = ?1 AND class_id = ?2 AND read_at IS NULL",
        )?;
        for candidate in candidates {
            if stmt.execute(params![candidate.id.get(), class.get(), now])? == 1 {
                acknowledged.push(candidate);
            }
        }
    }
    tx.commit()?;
    if !acknowledged.is_empty() {
        info!(class = %class, count = acknowledged.len(), "circulars read to class");
    }
    Ok(acknowledged)
}
