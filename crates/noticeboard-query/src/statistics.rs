// SPDX-License-Identifier: Apache-2.0

//! Per-circular read statistics.
//!
//! Teachers who coordinate a class are counted twice: once in the teacher
//! bucket and again in the coordinator bucket. The buckets overlap; they
//! are not a partition of the recipients.

use noticeboard_core::DocumentId;
use noticeboard_model::{ClassTally, ReadStatistics, Role, Tally};
use noticeboard_store::{class_from_row, CLASS_COLUMNS};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::QueryError;

/// Recipient counts for one (role, coordinator, secretary) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGroup {
    pub role: Role,
    pub coordinator: bool,
    pub secretary: bool,
    pub tally: Tally,
}

#[derive(Debug, Default)]
struct Buckets {
    student: Option<Tally>,
    parent: Option<Tally>,
    ata: Option<Tally>,
    secretary: Option<Tally>,
    teacher: Option<Tally>,
    coordinator: Option<Tally>,
}

fn accumulate(slot: &mut Option<Tally>, tally: Tally) {
    *slot = Some(match *slot {
        Some(acc) => acc.plus(tally),
        None => tally,
    });
}

/// Folds role groups into buckets; buckets that received nothing keep the
/// `(1, 1)` default. The class bucket is left at its default.
#[must_use]
pub fn fold_role_groups(groups: &[RoleGroup]) -> ReadStatistics {
    let mut buckets = Buckets::default();
    for group in groups {
        match group.role {
            Role::Student => accumulate(&mut buckets.student, group.tally),
            Role::Parent => accumulate(&mut buckets.parent, group.tally),
            Role::Ata if group.secretary => accumulate(&mut buckets.secretary, group.tally),
            Role::Ata => accumulate(&mut buckets.ata, group.tally),
            role if role.is_teacher_like() => {
                if group.coordinator {
                    accumulate(&mut buckets.coordinator, group.tally);
                }
                accumulate(&mut buckets.teacher, group.tally);
            }
            _ => {}
        }
    }
    ReadStatistics {
        student: buckets.student.unwrap_or_default(),
        parent: buckets.parent.unwrap_or_default(),
        ata: buckets.ata.unwrap_or_default(),
        secretary: buckets.secretary.unwrap_or_default(),
        teacher: buckets.teacher.unwrap_or_default(),
        coordinator: buckets.coordinator.unwrap_or_default(),
        classes: ClassTally::default(),
    }
}

pub fn role_groups(conn: &Connection, document: DocumentId) -> Result<Vec<RoleGroup>, QueryError> {
    let mut stmt = conn.prepare_cached(
        "SELECT u.role,
                EXISTS (SELECT 1 FROM classes cl WHERE cl.coordinator_id = u.id) AS coord,
                u.secretary AS segr,
                COUNT(*) AS total,
                COUNT(ra.read_at) AS acknowledged
         FROM recipient_acks ra
         JOIN users u ON u.id = ra.user_id
         WHERE ra.document_id = ?1
         GROUP BY u.role, coord, segr
         ORDER BY u.role, coord, segr",
    )?;
    let groups = stmt
        .query_map([document.get()], |row| {
            let role: String = row.get(0)?;
            let role = Role::parse(&role).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
            })?;
            Ok(RoleGroup {
                role,
                coordinator: row.get(1)?,
                secretary: row.get(2)?,
                tally: Tally::new(row.get(3)?, row.get(4)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(groups)
}

pub fn class_tally(conn: &Connection, document: DocumentId) -> Result<ClassTally, QueryError> {
    let (total, acknowledged): (u64, u64) = conn.query_row(
        "SELECT COUNT(*), COUNT(ca.read_at) FROM class_acks ca
         JOIN classes c ON c.id = ca.class_id
         WHERE ca.document_id = ?1",
        [document.get()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    if total == 0 {
        return Ok(ClassTally::default());
    }
    let mut tally = ClassTally {
        total,
        acknowledged,
        pending: Vec::new(),
    };
    if total > acknowledged {
        let sql = format!(
            "SELECT {CLASS_COLUMNS} FROM class_acks ca
             JOIN classes c ON c.id = ca.class_id
             WHERE ca.document_id = ?1 AND ca.read_at IS NULL
             ORDER BY c.year ASC, c.section ASC"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        tally.pending = stmt
            .query_map([document.get()], class_from_row)?
            .map(|class| class.map(|c| c.name()))
            .collect::<Result<Vec<_>, _>>()?;
    }
    Ok(tally)
}

/// Read statistics for one circular, bucketed by recipient category.
pub fn compute_statistics(
    conn: &Connection,
    document: DocumentId,
) -> Result<ReadStatistics, QueryError> {
    let exists: Option<i64> = conn
        .query_row("SELECT id FROM documents WHERE id = ?1", [document.get()], |row| {
            row.get(0)
        })
        .optional()?;
    if exists.is_none() {
        return Err(QueryError::not_found(format!("document {document} not found")));
    }
    let mut stats = fold_role_groups(&role_groups(conn, document)?);
    stats.classes = class_tally(conn, document)?;
    Ok(stats)
}
