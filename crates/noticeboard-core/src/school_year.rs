// SPDX-License-Identifier: Apache-2.0

//! School-year window: September 1 of year Y through August 31 of year Y+1.
//!
//! The canonical text form is `"Y/Y+1"`, e.g. `"2023/2024"`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

pub const FIRST_MONTH: u32 = 9;
pub const LAST_MONTH: u32 = 8;
pub const LAST_DAY: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolYear {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl SchoolYear {
    pub fn starting_in(year: i32) -> Result<Self> {
        let label = format!("{year}/{}", year.saturating_add(1));
        if !(1000..=9998).contains(&year) {
            return Err(Error::InvalidSchoolYear {
                value: label,
                reason: "years must have four digits",
            });
        }
        let first_day = NaiveDate::from_ymd_opt(year, FIRST_MONTH, 1);
        let last_day = NaiveDate::from_ymd_opt(year + 1, LAST_MONTH, LAST_DAY);
        match (first_day, last_day) {
            (Some(first_day), Some(last_day)) => Ok(Self {
                first_day,
                last_day,
            }),
            _ => Err(Error::InvalidSchoolYear {
                value: label,
                reason: "window is not representable",
            }),
        }
    }

    /// School year whose window contains `date`.
    pub fn containing(date: NaiveDate) -> Result<Self> {
        if date.month() >= FIRST_MONTH {
            Self::starting_in(date.year())
        } else {
            Self::starting_in(date.year() - 1)
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        let invalid = |reason| Error::InvalidSchoolYear {
            value: raw.to_string(),
            reason,
        };
        let (first, second) = raw
            .split_once('/')
            .ok_or_else(|| invalid("expected the form YYYY/YYYY"))?;
        if first.len() != 4 || second.len() != 4 {
            return Err(invalid("years must have four digits"));
        }
        let first: i32 = first
            .parse()
            .map_err(|_| invalid("years must be numeric"))?;
        let second: i32 = second
            .parse()
            .map_err(|_| invalid("years must be numeric"))?;
        if second != first + 1 {
            return Err(invalid("second year must follow the first"));
        }
        Self::starting_in(first)
    }

    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.first_day
    }

    #[must_use]
    pub const fn last_day(self) -> NaiveDate {
        self.last_day
    }

    #[must_use]
    pub fn start_year(self) -> i32 {
        self.first_day.year()
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("{}/{}", self.first_day.year(), self.last_day.year())
    }
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for SchoolYear {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SchoolYear {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SchoolYear> for String {
    fn from(value: SchoolYear) -> Self {
        value.label()
    }
}
