// SPDX-License-Identifier: Apache-2.0

//! Expands a circular's audience into acknowledgment rows.
//!
//! Every insert is `INSERT OR IGNORE` against the `(document, user)` and
//! `(document, class)` unique keys, so resolving twice adds nothing and
//! resolving after enrolment changes only adds the newcomers.

use noticeboard_core::DocumentId;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::QueryError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub recipients_added: u64,
    pub classes_added: u64,
    pub recipients_total: u64,
    pub classes_total: u64,
}

const WHOLE_SCHOOL_USERS: &str = "
    INSERT OR IGNORE INTO recipient_acks (document_id, user_id)
    SELECT d.id, u.id FROM documents d, users u
    WHERE d.id = ?1 AND d.whole_school = 1 AND u.enabled = 1";

const WHOLE_SCHOOL_CLASSES: &str = "
    INSERT OR IGNORE INTO class_acks (document_id, class_id)
    SELECT d.id, c.id FROM documents d, classes c
    WHERE d.id = ?1 AND d.whole_school = 1";

const TARGET_CLASSES: &str = "
    INSERT OR IGNORE INTO class_acks (document_id, class_id)
    SELECT dc.document_id, dc.class_id FROM document_classes dc
    WHERE dc.document_id = ?1";

const TARGET_CLASS_STUDENTS: &str = "
    INSERT OR IGNORE INTO recipient_acks (document_id, user_id)
    SELECT dc.document_id, u.id FROM document_classes dc
    JOIN users u ON u.class_id = dc.class_id
    WHERE dc.document_id = ?1 AND u.role = 'student' AND u.enabled = 1";

const TARGET_CLASS_PARENTS: &str = "
    INSERT OR IGNORE INTO recipient_acks (document_id, user_id)
    SELECT dc.document_id, p.id FROM document_classes dc
    JOIN documents d ON d.id = dc.document_id
    JOIN users s ON s.class_id = dc.class_id
    JOIN users p ON p.child_id = s.id
    WHERE dc.document_id = ?1 AND d.include_parents = 1
      AND s.role = 'student' AND s.enabled = 1
      AND p.role = 'parent' AND p.enabled = 1";

const TARGET_USERS: &str = "
    INSERT OR IGNORE INTO recipient_acks (document_id, user_id)
    SELECT du.document_id, du.user_id FROM document_users du
    WHERE du.document_id = ?1";

/// Materializes acknowledgment rows for a published circular.
///
/// Run inside the caller's transaction; drafts are refused.
pub fn resolve_distribution(
    conn: &Connection,
    document: DocumentId,
) -> Result<DistributionReport, QueryError> {
    let published: Option<bool> = conn
        .query_row(
            "SELECT published FROM documents WHERE id = ?1",
            [document.get()],
            |row| row.get(0),
        )
        .optional()?;
    match published {
        None => return Err(QueryError::not_found(format!("document {document} not found"))),
        Some(false) => {
            return Err(QueryError::conflict(format!(
                "document {document} is a draft and has no recipients"
            )))
        }
        Some(true) => {}
    }

    let id = document.get();
    let mut report = DistributionReport::default();
    for sql in [
        WHOLE_SCHOOL_USERS,
        TARGET_CLASS_STUDENTS,
        TARGET_CLASS_PARENTS,
        TARGET_USERS,
    ] {
        report.recipients_added += conn.execute(sql, [id])? as u64;
    }
    for sql in [WHOLE_SCHOOL_CLASSES, TARGET_CLASSES] {
        report.classes_added += conn.execute(sql, [id])? as u64;
    }
    report.recipients_total = conn.query_row(
        "SELECT COUNT(*) FROM recipient_acks WHERE document_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    report.classes_total = conn.query_row(
        "SELECT COUNT(*) FROM class_acks WHERE document_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    debug!(
        document = %document,
        recipients_added = report.recipients_added,
        classes_added = report.classes_added,
        "distribution resolved"
    );
    Ok(report)
}
