// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use noticeboard_core::{ClassId, DocumentId, UserId};
use noticeboard_model::{NewClass, NewDocument, NewUser};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::StoreError;

pub fn insert_user(conn: &Connection, user: &NewUser) -> Result<UserId, StoreError> {
    let user = user.validate()?;
    conn.execute(
        "INSERT INTO users (username, full_name, email, role, secretary, enabled, class_id, child_id)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
        params![
            user.username,
            user.full_name,
            user.email,
            user.role.as_str(),
            user.secretary,
            user.class.map(ClassId::get),
            user.child.map(UserId::get),
        ],
    )?;
    let id = UserId::new(conn.last_insert_rowid()).map_err(|e| StoreError(e.to_string()))?;
    debug!(user = %id, role = %user.role, "user inserted");
    Ok(id)
}

pub fn insert_class(conn: &Connection, class: &NewClass) -> Result<ClassId, StoreError> {
    let class = NewClass::parse(class.year, &class.section)?;
    conn.execute(
        "INSERT INTO classes (year, section) VALUES (?1, ?2)",
        params![class.year, class.section],
    )?;
    ClassId::new(conn.last_insert_rowid()).map_err(|e| StoreError(e.to_string()))
}

/// Assigns (or clears) the coordinating teacher of a class.
pub fn set_coordinator(
    conn: &Connection,
    class: ClassId,
    teacher: Option<UserId>,
) -> Result<(), StoreError> {
    if let Some(teacher) = teacher {
        let role: Option<String> = conn
            .query_row("SELECT role FROM users WHERE id = ?1", [teacher.get()], |row| row.get(0))
            .optional()?;
        match role.as_deref() {
            Some("teacher") | Some("staff") => {}
            Some(other) => {
                return Err(StoreError(format!(
                    "user {teacher} has role {other} and cannot coordinate a class"
                )))
            }
            None => return Err(StoreError(format!("user {teacher} not found"))),
        }
    }
    let changed = conn.execute(
        "UPDATE classes SET coordinator_id = ?2 WHERE id = ?1",
        params![class.get(), teacher.map(UserId::get)],
    )?;
    if changed == 0 {
        return Err(StoreError(format!("class {class} not found")));
    }
    Ok(())
}

/// Moves a student to another class (or withdraws it with `None`).
/// Acknowledgment rows already materialized stay with the student.
pub fn set_user_class(
    conn: &Connection,
    user: UserId,
    class: Option<ClassId>,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE users SET class_id = ?2 WHERE id = ?1 AND role = 'student'",
        params![user.get(), class.map(ClassId::get)],
    )?;
    if changed == 0 {
        return Err(StoreError(format!("student {user} not found")));
    }
    Ok(())
}

pub fn set_user_enabled(conn: &Connection, user: UserId, enabled: bool) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE users SET enabled = ?2 WHERE id = ?1",
        params![user.get(), enabled],
    )?;
    if changed == 0 {
        return Err(StoreError(format!("user {user} not found")));
    }
    Ok(())
}

/// Stores `at` as the latest login and returns the one it replaces.
pub fn record_login(
    conn: &Connection,
    user: UserId,
    at: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    let previous: Option<DateTime<Utc>> = conn.query_row(
        "SELECT last_login_at FROM users WHERE id = ?1",
        [user.get()],
        |row| row.get(0),
    )?;
    conn.execute(
        "UPDATE users SET last_login_at = ?2 WHERE id = ?1",
        params![user.get(), at],
    )?;
    Ok(previous)
}

/// Inserts a draft with its audience in one transaction.
pub fn insert_draft(conn: &mut Connection, document: &NewDocument) -> Result<DocumentId, StoreError> {
    let tx = conn.transaction()?;
    let id = insert_draft_rows(&tx, document)?;
    tx.commit()?;
    Ok(id)
}

/// Writes a draft and its audience on `conn` without opening a
/// transaction; callers that need a check before the insert own it.
pub fn insert_draft_rows(conn: &Connection, document: &NewDocument) -> Result<DocumentId, StoreError> {
    let document = document.validate()?;
    let attachments =
        serde_json::to_string(&document.attachments).map_err(|e| StoreError(e.to_string()))?;
    conn.execute(
        "INSERT INTO documents (number, date, subject, file, attachments, published, whole_school, include_parents)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
        params![
            document.number,
            document.date,
            document.subject,
            document.file,
            attachments,
            document.audience.whole_school,
            document.audience.include_parents,
        ],
    )?;
    let id = DocumentId::new(conn.last_insert_rowid()).map_err(|e| StoreError(e.to_string()))?;
    {
        let mut stmt =
            conn.prepare("INSERT INTO document_classes (document_id, class_id) VALUES (?1, ?2)")?;
        for class in &document.audience.classes {
            stmt.execute(params![id.get(), class.get()])?;
        }
        let mut stmt =
            conn.prepare("INSERT INTO document_users (document_id, user_id) VALUES (?1, ?2)")?;
        for user in &document.audience.users {
            stmt.execute(params![id.get(), user.get()])?;
        }
    }
    info!(document = %id, subject = %document.subject, "draft created");
    Ok(id)
}
