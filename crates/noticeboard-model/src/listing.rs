// SPDX-License-Identifier: Apache-2.0

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::validation::ValidationError;

/// Which circulars a recipient browses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceFilter {
    /// Every published circular.
    #[default]
    All,
    /// Only circulars addressed to the user.
    Targeted,
    /// Only addressed circulars the user has not read yet.
    Unread,
}

/// Calendar month filter in `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let raw = input.trim();
        let invalid = || ValidationError(format!("invalid month `{raw}`, expected YYYY-MM"));
        let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One page of a listing; `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_parses_and_formats() {
        let ym = YearMonth::parse("2023-9").expect("month");
        assert_eq!(ym.to_string(), "2023-09");
        assert!(YearMonth::parse("2023-13").is_err());
        assert!(YearMonth::parse("23-01").is_err());
    }

    #[test]
    fn page_count_rounds_up() {
        let page: Page<u8> = Page {
            items: vec![],
            page: 1,
            limit: 20,
            total: 41,
        };
        assert_eq!(page.page_count(), 3);
    }
}
