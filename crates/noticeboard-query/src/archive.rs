// SPDX-License-Identifier: Apache-2.0

//! Copies published circulars into a flat archive directory with
//! self-describing file names.

use std::fs;
use std::path::{Path, PathBuf};

use noticeboard_model::Document;
use noticeboard_store::{document_from_row, DOCUMENT_COLUMNS};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::QueryError;

pub const ARCHIVE_SUBDIR: &str = "circulars";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRequest {
    /// Directory the stored file names are relative to.
    pub documents_dir: PathBuf,
    pub archive_root: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub archived: u64,
    pub files_copied: u64,
    pub warnings: Vec<String>,
}

/// `circular-007-of-05-10-2023.pdf`, or with `-attachment-K` before the
/// extension for the K-th attachment (1-based).
#[must_use]
pub fn archive_file_name(document: &Document, source: &str, attachment: Option<usize>) -> String {
    let mut name = format!(
        "circular-{:03}-of-{}",
        document.number.unwrap_or(0),
        document.date.format("%d-%m-%Y")
    );
    if let Some(k) = attachment {
        name.push_str(&format!("-attachment-{k}"));
    }
    if let Some(ext) = Path::new(source).extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(&ext.to_ascii_lowercase());
    }
    name
}

fn published_in_order(conn: &Connection) -> Result<Vec<Document>, QueryError> {
    let sql = format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents d WHERE d.published = 1 ORDER BY d.number ASC, d.date ASC, d.id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], document_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Copies every published circular and its attachments. Missing source
/// files are reported as warnings; other I/O failures abort the export.
pub fn archive_published(
    conn: &Connection,
    request: &ArchiveRequest,
) -> Result<ArchiveReport, QueryError> {
    let target = request.archive_root.join(ARCHIVE_SUBDIR);
    fs::create_dir_all(&target)?;
    let mut report = ArchiveReport::default();
    for document in published_in_order(conn)? {
        let files = std::iter::once((document.file.as_str(), None)).chain(
            document
                .attachments
                .iter()
                .enumerate()
                .map(|(i, file)| (file.as_str(), Some(i + 1))),
        );
        let mut complete = true;
        for (file, attachment) in files {
            let source = request.documents_dir.join(file);
            if !source.is_file() {
                let message = format!(
                    "circular {} ({}): missing file {}",
                    document.number.unwrap_or(0),
                    document.date,
                    source.display()
                );
                warn!(document = %document.id, file = %source.display(), "archive source missing");
                report.warnings.push(message);
                complete = false;
                continue;
            }
            let destination = target.join(archive_file_name(&document, file, attachment));
            fs::copy(&source, &destination)?;
            report.files_copied += 1;
        }
        if complete {
            report.archived += 1;
        }
    }
    if report.archived == 0 {
        warn!("no circular was archived");
        report.warnings.push("no circular was archived".to_string());
    }
    info!(
        archived = report.archived,
        files = report.files_copied,
        warnings = report.warnings.len(),
        "archive export finished"
    );
    Ok(report)
}
