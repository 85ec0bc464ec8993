// SPDX-License-Identifier: Apache-2.0

use noticeboard_core::{SchoolYear, ENV_NOTICEBOARD_DB, ENV_NOTICEBOARD_SCHOOL_YEAR};
use noticeboard_store::school_year as stored_school_year;
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;

pub(crate) const DEFAULT_DB_PATH: &str = "noticeboard.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TrackerConfig {
    pub school_year: Option<SchoolYear>,
    pub page_size: u32,
    pub archive_root: PathBuf,
    pub documents_dir: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            school_year: None,
            page_size: 20,
            archive_root: PathBuf::from("archive"),
            documents_dir: PathBuf::from("documents"),
        }
    }
}

impl TrackerConfig {
    pub(crate) fn load(conn: &Connection, flag: Option<&str>) -> Result<Self, String> {
        let env = std::env::var(ENV_NOTICEBOARD_SCHOOL_YEAR).ok();
        let stored = stored_school_year(conn).map_err(|e| e.to_string())?;
        Ok(Self {
            school_year: resolve_school_year(flag, env.as_deref(), stored)?,
            ..Self::default()
        })
    }

    pub(crate) fn require_school_year(&self) -> Result<SchoolYear, String> {
        self.school_year.ok_or_else(|| {
            "school year is not configured; run `noticeboard init --school-year YYYY/YYYY`"
                .to_string()
        })
    }
}

/// Flag, then environment, then the value stored in the database.
pub(crate) fn resolve_school_year(
    flag: Option<&str>,
    env: Option<&str>,
    stored: Option<SchoolYear>,
) -> Result<Option<SchoolYear>, String> {
    match flag.or(env).map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => SchoolYear::parse(raw).map(Some).map_err(|e| e.to_string()),
        None => Ok(stored),
    }
}

pub(crate) fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(ENV_NOTICEBOARD_DB).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}
