// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Parent,
    /// Administrative, technical and auxiliary staff.
    Ata,
    Teacher,
    /// Teacher-like staff member (principal's collaborators).
    Staff,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Student,
        Role::Parent,
        Role::Ata,
        Role::Teacher,
        Role::Staff,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Parent => "parent",
            Self::Ata => "ata",
            Self::Teacher => "teacher",
            Self::Staff => "staff",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| ValidationError(format!("unknown role `{}`", input.trim())))
    }

    /// Counted in the teacher bucket of read statistics.
    #[must_use]
    pub const fn is_teacher_like(self) -> bool {
        matches!(self, Self::Teacher | Self::Staff)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_total() {
        for role in Role::ALL {
            assert_eq!(Role::parse(&role.as_str().to_uppercase()).expect("role"), role);
        }
        assert!(Role::parse("janitor").is_err());
    }

    #[test]
    fn staff_counts_as_teacher() {
        assert!(Role::Staff.is_teacher_like());
        assert!(Role::Teacher.is_teacher_like());
        assert!(!Role::Ata.is_teacher_like());
    }
}
