// SPDX-License-Identifier: Apache-2.0

use noticeboard_core::{ClassId, UserId};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

pub const SECTION_MAX_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub year: u8,
    pub section: String,
    pub coordinator: Option<UserId>,
}

impl Class {
    /// Human-readable name, e.g. `3A`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}{}", self.year, self.section)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub year: u8,
    pub section: String,
}

impl NewClass {
    pub fn parse(year: u8, section: &str) -> Result<Self, ValidationError> {
        if !(1..=9).contains(&year) {
            return Err(ValidationError(format!("class year {year} out of range 1..=9")));
        }
        let section = section.trim().to_ascii_uppercase();
        if section.is_empty() || section.len() > SECTION_MAX_LEN {
            return Err(ValidationError(format!(
                "class section must be 1..={SECTION_MAX_LEN} characters"
            )));
        }
        if !section.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError(
                "class section must be alphanumeric".to_string(),
            ));
        }
        Ok(Self { year, section })
    }
}
