// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod errors;
pub mod ports;
pub mod school_year;
pub mod types;

pub use errors::{Error, ExitCode, MachineError, Result};
pub use ports::{Clock, FixedClock, SystemClock};
pub use school_year::SchoolYear;
pub use types::{ClassId, DocumentId, UserId};

pub const CRATE_NAME: &str = "noticeboard-core";

pub const ENV_NOTICEBOARD_LOG_LEVEL: &str = "NOTICEBOARD_LOG_LEVEL";
pub const ENV_NOTICEBOARD_DB: &str = "NOTICEBOARD_DB";
pub const ENV_NOTICEBOARD_SCHOOL_YEAR: &str = "NOTICEBOARD_SCHOOL_YEAR";
