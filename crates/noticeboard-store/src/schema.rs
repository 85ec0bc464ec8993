// SPDX-License-Identifier: Apache-2.0

use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use crate::StoreError;

pub const SQLITE_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS settings (
      k TEXT PRIMARY KEY,
      v TEXT NOT NULL
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS classes (
      id INTEGER PRIMARY KEY,
      year INTEGER NOT NULL,
      section TEXT NOT NULL,
      coordinator_id INTEGER REFERENCES users(id),
      UNIQUE (year, section)
    );
    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY,
      username TEXT NOT NULL UNIQUE,
      full_name TEXT NOT NULL,
      email TEXT NOT NULL UNIQUE,
      role TEXT NOT NULL CHECK (role IN ('student', 'parent', 'ata', 'teacher', 'staff')),
      secretary INTEGER NOT NULL DEFAULT 0,
      enabled INTEGER NOT NULL DEFAULT 1,
      class_id INTEGER REFERENCES classes(id),
      child_id INTEGER REFERENCES users(id),
      last_login_at TEXT
    );
    CREATE TABLE IF NOT EXISTS documents (
      id INTEGER PRIMARY KEY,
      number INTEGER,
      date TEXT NOT NULL,
      subject TEXT NOT NULL,
      file TEXT NOT NULL,
      attachments TEXT NOT NULL DEFAULT '[]',
      published INTEGER NOT NULL DEFAULT 0,
      whole_school INTEGER NOT NULL DEFAULT 0,
      include_parents INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE IF NOT EXISTS document_classes (
      document_id INTEGER NOT NULL REFERENCES documents(id),
      class_id INTEGER NOT NULL REFERENCES classes(id),
      PRIMARY KEY (document_id, class_id)
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS document_users (
      document_id INTEGER NOT NULL REFERENCES documents(id),
      user_id INTEGER NOT NULL REFERENCES users(id),
      PRIMARY KEY (document_id, user_id)
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS recipient_acks (
      id INTEGER PRIMARY KEY,
      document_id INTEGER NOT NULL REFERENCES documents(id),
      user_id INTEGER NOT NULL REFERENCES users(id),
      read_at TEXT,
      confirmed_at TEXT,
      UNIQUE (document_id, user_id),
      CHECK (confirmed_at IS NULL OR read_at IS NOT NULL)
    );
    CREATE TABLE IF NOT EXISTS class_acks (
      id INTEGER PRIMARY KEY,
      document_id INTEGER NOT NULL REFERENCES documents(id),
      class_id INTEGER NOT NULL REFERENCES classes(id),
      read_at TEXT,
      UNIQUE (document_id, class_id)
    );
    CREATE INDEX IF NOT EXISTS idx_documents_date ON documents(date, number);
    CREATE INDEX IF NOT EXISTS idx_documents_number ON documents(number);
    CREATE INDEX IF NOT EXISTS idx_users_class ON users(class_id);
    CREATE INDEX IF NOT EXISTS idx_users_child ON users(child_id);
    CREATE INDEX IF NOT EXISTS idx_classes_coordinator ON classes(coordinator_id);
    CREATE INDEX IF NOT EXISTS idx_recipient_acks_user ON recipient_acks(user_id);
    CREATE INDEX IF NOT EXISTS idx_class_acks_class ON class_acks(class_id);

    CREATE TRIGGER IF NOT EXISTS documents_publication_is_final
    BEFORE UPDATE OF published ON documents
    WHEN OLD.published = 1 AND NEW.published = 0
    BEGIN
      SELECT RAISE(ABORT, 'published circular cannot return to draft');
    END;
    CREATE TRIGGER IF NOT EXISTS recipient_acks_confirmation_is_final
    BEFORE UPDATE OF read_at, confirmed_at ON recipient_acks
    WHEN OLD.confirmed_at IS NOT NULL
    BEGIN
      SELECT RAISE(ABORT, 'confirmed acknowledgment is immutable');
    END;
    CREATE TRIGGER IF NOT EXISTS class_acks_mark_is_final
    BEFORE UPDATE OF read_at ON class_acks
    WHEN OLD.read_at IS NOT NULL
    BEGIN
      SELECT RAISE(ABORT, 'class acknowledgment is immutable');
    END;
    CREATE TRIGGER IF NOT EXISTS recipient_acks_are_kept
    BEFORE DELETE ON recipient_acks
    WHEN EXISTS (SELECT 1 FROM documents WHERE id = OLD.document_id)
    BEGIN
      SELECT RAISE(ABORT, 'acknowledgments live as long as their circular');
    END;
    CREATE TRIGGER IF NOT EXISTS class_acks_are_kept
    BEFORE DELETE ON class_acks
    WHEN EXISTS (SELECT 1 FROM documents WHERE id = OLD.document_id)
    BEGIN
      SELECT RAISE(ABORT, 'acknowledgments live as long as their circular');
    END;
";

/// Opens (creating if needed) a file-backed database and applies the schema.
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;
        PRAGMA busy_timeout=5000;
        ",
    )?;
    apply_schema(&conn)?;
    debug!(path = %path.display(), "database opened");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    apply_schema(&conn)?;
    Ok(conn)
}

pub fn apply_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version > SQLITE_SCHEMA_VERSION {
        return Err(StoreError(format!(
            "database schema version {version} is newer than supported {SQLITE_SCHEMA_VERSION}"
        )));
    }
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(&format!("PRAGMA user_version={SQLITE_SCHEMA_VERSION};"))?;
    Ok(())
}
