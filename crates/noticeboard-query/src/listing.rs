// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDate;
use noticeboard_core::UserId;
use noticeboard_model::{
    AudienceFilter, Document, Page, RecipientAcknowledgment, YearMonth,
};
use noticeboard_store::{
    document_from_row, recipient_ack_from_row, DOCUMENT_COLUMNS, RECIPIENT_ACK_COLUMNS,
};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use serde::{Deserialize, Serialize};

use crate::{QueryError, QueryErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingLimits {
    pub max_limit: u32,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self { max_limit: 100 }
    }
}

/// Archive search over published circulars. Both bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedSearch {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListing {
    pub audience: AudienceFilter,
    pub month: Option<YearMonth>,
    pub subject: Option<String>,
}

/// A circular as seen by one user, with their acknowledgment row when the
/// circular was addressed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedDocument {
    pub document: Document,
    pub acknowledgment: Option<RecipientAcknowledgment>,
}

fn validate_page(page: u32, limit: u32, limits: &ListingLimits) -> Result<(), QueryError> {
    if page == 0 {
        return Err(QueryError::new(
            QueryErrorCode::Validation,
            "page numbers start at 1",
        ));
    }
    if limit == 0 || limit > limits.max_limit {
        return Err(QueryError::new(
            QueryErrorCode::Validation,
            format!("limit must be between 1 and {}", limits.max_limit),
        ));
    }
    Ok(())
}

fn escape_like(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '!' | '%' | '_') {
            out.push('!');
        }
        out.push(c);
    }
    out
}

fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

fn push_subject(subject: Option<&str>, where_parts: &mut Vec<String>, params: &mut Vec<Value>) {
    if let Some(subject) = subject.map(str::trim).filter(|s| !s.is_empty()) {
        where_parts.push("d.subject LIKE ? ESCAPE '!'".to_string());
        params.push(Value::Text(format!("%{}%", escape_like(subject))));
    }
}

fn offset(page: u32, limit: u32) -> i64 {
    i64::from(page - 1) * i64::from(limit)
}

fn count(conn: &Connection, from_where: &str, params: &[Value]) -> Result<u64, QueryError> {
    let sql = format!("SELECT COUNT(*) {from_where}");
    Ok(conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?)
}

fn build_search(search: &PublishedSearch) -> Result<(String, Vec<Value>), QueryError> {
    let mut where_parts = vec!["d.published = 1".to_string()];
    let mut params = Vec::new();
    if let (Some(from), Some(to)) = (search.from, search.to) {
        if from > to {
            return Err(QueryError::new(
                QueryErrorCode::Validation,
                format!("search range starts after it ends ({from} > {to})"),
            ));
        }
    }
    if let Some(from) = search.from {
        where_parts.push("d.date >= ?".to_string());
        params.push(date_value(from));
    }
    if let Some(to) = search.to {
        where_parts.push("d.date <= ?".to_string());
        params.push(date_value(to));
    }
    push_subject(search.subject.as_deref(), &mut where_parts, &mut params);
    Ok((
        format!("FROM documents d WHERE {}", where_parts.join(" AND ")),
        params,
    ))
}

/// Published circulars matching `search`, newest first.
pub fn search_published(
    conn: &Connection,
    search: &PublishedSearch,
    page: u32,
    limit: u32,
    limits: &ListingLimits,
) -> Result<Page<Document>, QueryError> {
    validate_page(page, limit, limits)?;
    let (from_where, mut params) = build_search(search)?;
    let total = count(conn, &from_where, &params)?;

    let sql = format!(
        "SELECT {DOCUMENT_COLUMNS} {from_where} ORDER BY d.date DESC, d.number DESC, d.id DESC LIMIT ? OFFSET ?"
    );
    params.push(Value::Integer(i64::from(limit)));
    params.push(Value::Integer(offset(page, limit)));
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params_from_iter(params.iter()), document_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page {
        items,
        page,
        limit,
        total,
    })
}

fn build_user_listing(listing: &UserListing, user: UserId) -> (String, Vec<Value>) {
    let mut params = vec![Value::Integer(user.get())];
    let mut where_parts = vec!["d.published = 1".to_string()];
    match listing.audience {
        AudienceFilter::All => {}
        AudienceFilter::Targeted => where_parts.push("ra.user_id IS NOT NULL".to_string()),
        AudienceFilter::Unread => {
            where_parts.push("ra.user_id IS NOT NULL".to_string());
            where_parts.push("ra.read_at IS NULL".to_string());
        }
    }
    if let Some(month) = listing.month {
        where_parts.push("strftime('%Y-%m', d.date) = ?".to_string());
        params.push(Value::Text(month.to_string()));
    }
    push_subject(listing.subject.as_deref(), &mut where_parts, &mut params);
    (
        format!(
            "FROM documents d LEFT JOIN recipient_acks ra ON ra.document_id = d.id AND ra.user_id = ? WHERE {}",
            where_parts.join(" AND ")
        ),
        params,
    )
}

/// Published circulars as browsed by `user`, newest first.
pub fn list_for_user(
    conn: &Connection,
    listing: &UserListing,
    user: UserId,
    page: u32,
    limit: u32,
    limits: &ListingLimits,
) -> Result<Page<ListedDocument>, QueryError> {
    validate_page(page, limit, limits)?;
    let (from_where, mut params) = build_user_listing(listing, user);
    let total = count(conn, &from_where, &params)?;

    let sql = format!(
        "SELECT {DOCUMENT_COLUMNS}, {RECIPIENT_ACK_COLUMNS} {from_where} ORDER BY d.date DESC, d.number DESC, d.id DESC LIMIT ? OFFSET ?"
    );
    params.push(Value::Integer(i64::from(limit)));
    params.push(Value::Integer(offset(page, limit)));
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            let document = document_from_row(row)?;
            let acknowledgment = match row.get::<_, Option<i64>>(7)? {
                Some(_) => Some(recipient_ack_from_row(row, 7)?),
                None => None,
            };
            Ok(ListedDocument {
                document,
                acknowledgment,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page {
        items,
        page,
        limit,
        total,
    })
}
