// SPDX-License-Identifier: Apache-2.0

use noticeboard_core::{ClassId, DocumentId, UserId};
use noticeboard_model::{
    Audience, Class, ClassAcknowledgment, Document, PublicationState, RecipientAcknowledgment,
    Role, User,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::StoreError;

pub const DOCUMENT_COLUMNS: &str =
    "d.id, d.number, d.date, d.subject, d.file, d.attachments, d.published";
pub const USER_COLUMNS: &str = "u.id, u.username, u.full_name, u.email, u.role, u.secretary, u.enabled, u.class_id, u.child_id, u.last_login_at";
pub const CLASS_COLUMNS: &str = "c.id, c.year, c.section, c.coordinator_id";
pub const RECIPIENT_ACK_COLUMNS: &str = "ra.document_id, ra.user_id, ra.read_at, ra.confirmed_at";

fn conversion<E>(idx: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn document_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<DocumentId> {
    DocumentId::new(row.get(idx)?).map_err(|e| conversion(idx, Type::Integer, e))
}

fn user_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<UserId> {
    UserId::new(row.get(idx)?).map_err(|e| conversion(idx, Type::Integer, e))
}

fn optional_user_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<UserId>> {
    row.get::<_, Option<i64>>(idx)?
        .map(|v| UserId::new(v).map_err(|e| conversion(idx, Type::Integer, e)))
        .transpose()
}

fn class_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<ClassId> {
    ClassId::new(row.get(idx)?).map_err(|e| conversion(idx, Type::Integer, e))
}

/// Decodes a row selected with [`DOCUMENT_COLUMNS`] starting at column 0.
pub fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    let attachments: String = row.get(5)?;
    let attachments: Vec<String> =
        serde_json::from_str(&attachments).map_err(|e| conversion(5, Type::Text, e))?;
    let published: bool = row.get(6)?;
    Ok(Document {
        id: document_id(row, 0)?,
        number: row.get(1)?,
        date: row.get(2)?,
        subject: row.get(3)?,
        file: row.get(4)?,
        attachments,
        state: if published {
            PublicationState::Published
        } else {
            PublicationState::Draft
        },
    })
}

/// Decodes a row selected with [`USER_COLUMNS`] starting at column 0.
pub fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    let role = Role::parse(&role).map_err(|e| conversion(4, Type::Text, e))?;
    Ok(User {
        id: user_id(row, 0)?,
        username: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        role,
        secretary: row.get(5)?,
        enabled: row.get(6)?,
        class: row
            .get::<_, Option<i64>>(7)?
            .map(|v| ClassId::new(v).map_err(|e| conversion(7, Type::Integer, e)))
            .transpose()?,
        child: optional_user_id(row, 8)?,
        last_login_at: row.get(9)?,
    })
}

/// Decodes a row selected with [`CLASS_COLUMNS`] starting at column 0.
pub fn class_from_row(row: &Row<'_>) -> rusqlite::Result<Class> {
    Ok(Class {
        id: class_id(row, 0)?,
        year: row.get(1)?,
        section: row.get(2)?,
        coordinator: optional_user_id(row, 3)?,
    })
}

/// Decodes a row selected with [`RECIPIENT_ACK_COLUMNS`] starting at `offset`.
pub fn recipient_ack_from_row(
    row: &Row<'_>,
    offset: usize,
) -> rusqlite::Result<RecipientAcknowledgment> {
    RecipientAcknowledgment::from_parts(
        document_id(row, offset)?,
        user_id(row, offset + 1)?,
        row.get(offset + 2)?,
        row.get(offset + 3)?,
    )
    .map_err(|e| conversion(offset + 3, Type::Text, e))
}

pub fn load_document(conn: &Connection, id: DocumentId) -> Result<Option<Document>, StoreError> {
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents d WHERE d.id = ?1");
    Ok(conn
        .query_row(&sql, [id.get()], document_from_row)
        .optional()?)
}

pub fn load_audience(conn: &Connection, id: DocumentId) -> Result<Audience, StoreError> {
    let (whole_school, include_parents): (bool, bool) = conn
        .query_row(
            "SELECT whole_school, include_parents FROM documents WHERE id = ?1",
            [id.get()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .ok_or_else(|| StoreError(format!("document {id} not found")))?;

    let mut stmt = conn.prepare_cached(
        "SELECT class_id FROM document_classes WHERE document_id = ?1 ORDER BY class_id",
    )?;
    let classes = stmt
        .query_map([id.get()], |row| class_id(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT user_id FROM document_users WHERE document_id = ?1 ORDER BY user_id",
    )?;
    let users = stmt
        .query_map([id.get()], |row| user_id(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Audience {
        whole_school,
        classes,
        users,
        include_parents,
    })
}

pub fn load_user(conn: &Connection, id: UserId) -> Result<Option<User>, StoreError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?1");
    Ok(conn.query_row(&sql, [id.get()], user_from_row).optional()?)
}

/// Email lookup is case-insensitive; stored emails are lowercase.
pub fn load_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, StoreError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.email = ?1");
    let email = email.trim().to_ascii_lowercase();
    Ok(conn.query_row(&sql, [email], user_from_row).optional()?)
}

pub fn load_class(conn: &Connection, id: ClassId) -> Result<Option<Class>, StoreError> {
    let sql = format!("SELECT {CLASS_COLUMNS} FROM classes c WHERE c.id = ?1");
    Ok(conn.query_row(&sql, [id.get()], class_from_row).optional()?)
}

pub fn load_recipient_acknowledgment(
    conn: &Connection,
    document: DocumentId,
    user: UserId,
) -> Result<Option<RecipientAcknowledgment>, StoreError> {
    let sql = format!(
        "SELECT {RECIPIENT_ACK_COLUMNS} FROM recipient_acks ra WHERE ra.document_id = ?1 AND ra.user_id = ?2"
    );
    Ok(conn
        .query_row(&sql, params![document.get(), user.get()], |row| {
            recipient_ack_from_row(row, 0)
        })
        .optional()?)
}

pub fn load_class_acknowledgment(
    conn: &Connection,
    document: DocumentId,
    class: ClassId,
) -> Result<Option<ClassAcknowledgment>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT ca.document_id, ca.class_id, ca.read_at FROM class_acks ca
             WHERE ca.document_id = ?1 AND ca.class_id = ?2",
            params![document.get(), class.get()],
            |row| {
                Ok(ClassAcknowledgment::from_parts(
                    document_id(row, 0)?,
                    class_id(row, 1)?,
                    row.get(2)?,
                ))
            },
        )
        .optional()?)
}
