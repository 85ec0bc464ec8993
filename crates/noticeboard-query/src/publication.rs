// SPDX-License-Identifier: Apache-2.0

use noticeboard_core::{DocumentId, SchoolYear};
use noticeboard_model::{Document, NewDocument};
use noticeboard_store::{insert_draft_rows, load_document, DOCUMENT_COLUMNS};
use rusqlite::{params, Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::distribution::{resolve_distribution, DistributionReport};
use crate::sequence::{is_sequence_number_available, next_sequence_number};
use crate::QueryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub document: Document,
    pub distribution: DistributionReport,
}

/// Stores a draft. A preset number must be free in the school year of the
/// draft's date; the check and the insert share one transaction.
pub fn create_draft(conn: &mut Connection, document: &NewDocument) -> Result<DocumentId, QueryError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if let Some(number) = document.number {
        let school_year = SchoolYear::containing(document.date)?;
        if !is_sequence_number_available(&tx, number, None, school_year)? {
            return Err(QueryError::conflict(format!(
                "circular number {number} is already used in school year {school_year}"
            )));
        }
    }
    let id = insert_draft_rows(&tx, document)?;
    tx.commit()?;
    Ok(id)
}

/// Publishes a draft: fixes its number (assigning the next one when the
/// draft has none), then materializes its acknowledgment rows. All or
/// nothing; a taken number leaves the draft untouched.
pub fn publish(
    conn: &mut Connection,
    id: DocumentId,
    school_year: SchoolYear,
) -> Result<Publication, QueryError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let draft = load_document(&tx, id)?
        .ok_or_else(|| QueryError::not_found(format!("document {id} not found")))?;
    if draft.state.is_published() {
        return Err(QueryError::conflict(format!(
            "document {id} is already published"
        )));
    }
    let number = match draft.number {
        Some(number) => number,
        None => next_sequence_number(&tx)?,
    };
    if !is_sequence_number_available(&tx, number, Some(id), school_year)? {
        return Err(QueryError::conflict(format!(
            "circular number {number} is already used in school year {school_year}"
        )));
    }
    tx.execute(
        "UPDATE documents SET number = ?2, published = 1 WHERE id = ?1 AND published = 0",
        params![id.get(), number],
    )?;
    let distribution = resolve_distribution(&tx, id)?;
    let document = load_document(&tx, id)?
        .ok_or_else(|| QueryError::not_found(format!("document {id} not found")))?;
    tx.commit()?;
    info!(
        document = %id,
        number,
        recipients = distribution.recipients_total,
        classes = distribution.classes_total,
        "circular published"
    );
    Ok(Publication {
        document,
        distribution,
    })
}

/// Re-runs audience expansion for a published circular, adding rows for
/// recipients that became eligible since publication.
pub fn redistribute(conn: &mut Connection, id: DocumentId) -> Result<DistributionReport, QueryError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let report = resolve_distribution(&tx, id)?;
    tx.commit()?;
    if report.recipients_added > 0 || report.classes_added > 0 {
        info!(
            document = %id,
            recipients_added = report.recipients_added,
            classes_added = report.classes_added,
            "circular redistributed"
        );
    }
    Ok(report)
}

/// Unpublished circulars, newest first.
pub fn drafts(conn: &Connection) -> Result<Vec<Document>, QueryError> {
    let sql = format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents d WHERE d.published = 0 ORDER BY d.date DESC, d.number DESC, d.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], noticeboard_store::document_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
