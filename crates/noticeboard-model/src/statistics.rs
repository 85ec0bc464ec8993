// SPDX-License-Identifier: Apache-2.0

//! Read statistics buckets.
//!
//! Every bucket starts as `(1, 1)`: an empty category reads as fully
//! acknowledged, so consumers can divide `acknowledged / total` unguarded.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Student,
    Parent,
    Ata,
    Secretary,
    Teacher,
    Coordinator,
    Class,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Student,
        Category::Parent,
        Category::Ata,
        Category::Secretary,
        Category::Teacher,
        Category::Coordinator,
        Category::Class,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Parent => "parent",
            Self::Ata => "ata",
            Self::Secretary => "secretary",
            Self::Teacher => "teacher",
            Self::Coordinator => "coordinator",
            Self::Class => "class",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total: u64,
    pub acknowledged: u64,
}

impl Tally {
    pub const VACUOUS: Tally = Tally {
        total: 1,
        acknowledged: 1,
    };

    #[must_use]
    pub const fn new(total: u64, acknowledged: u64) -> Self {
        Self {
            total,
            acknowledged,
        }
    }

    #[must_use]
    pub const fn plus(self, other: Tally) -> Tally {
        Tally {
            total: self.total + other.total,
            acknowledged: self.acknowledged + other.acknowledged,
        }
    }

    #[must_use]
    pub const fn pending(self) -> u64 {
        self.total.saturating_sub(self.acknowledged)
    }

    /// Whole-number percentage, rounded down.
    #[must_use]
    pub fn percent(self) -> u64 {
        if self.total == 0 {
            return 100;
        }
        self.acknowledged * 100 / self.total
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::VACUOUS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTally {
    pub total: u64,
    pub acknowledged: u64,
    /// Names of classes still to be read to, ordered by (year, section).
    pub pending: Vec<String>,
}

impl ClassTally {
    #[must_use]
    pub fn tally(&self) -> Tally {
        Tally::new(self.total, self.acknowledged)
    }
}

impl Default for ClassTally {
    fn default() -> Self {
        Self {
            total: 1,
            acknowledged: 1,
            pending: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadStatistics {
    pub student: Tally,
    pub parent: Tally,
    pub ata: Tally,
    pub secretary: Tally,
    pub teacher: Tally,
    pub coordinator: Tally,
    pub classes: ClassTally,
}

impl ReadStatistics {
    #[must_use]
    pub fn tally(&self, category: Category) -> Tally {
        match category {
            Category::Student => self.student,
            Category::Parent => self.parent,
            Category::Ata => self.ata,
            Category::Secretary => self.secretary,
            Category::Teacher => self.teacher,
            Category::Coordinator => self.coordinator,
            Category::Class => self.classes.tally(),
        }
    }
}
