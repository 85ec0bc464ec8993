// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDate;
use noticeboard_core::{ClassId, DocumentId, UserId};
use serde::{Deserialize, Serialize};

use crate::validation::{require_text, ValidationError};

pub const SUBJECT_MAX_LEN: usize = 255;
pub const FILE_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationState {
    Draft,
    Published,
}

impl PublicationState {
    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

/// A circular as stored. The number is fixed when the circular is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub number: Option<u32>,
    pub date: NaiveDate,
    pub subject: String,
    pub file: String,
    pub attachments: Vec<String>,
    pub state: PublicationState,
}

/// Who a circular is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    pub whole_school: bool,
    pub classes: Vec<ClassId>,
    pub users: Vec<UserId>,
    /// Extends class targets to the parents of their students.
    pub include_parents: bool,
}

impl Audience {
    #[must_use]
    pub fn whole_school() -> Self {
        Self {
            whole_school: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = ClassId>) -> Self {
        self.classes.extend(classes);
        self
    }

    #[must_use]
    pub fn with_users(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.users.extend(users);
        self
    }

    #[must_use]
    pub fn with_parents(mut self) -> Self {
        self.include_parents = true;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.whole_school && self.classes.is_empty() && self.users.is_empty()
    }

    fn normalized(&self) -> Self {
        let mut classes = self.classes.clone();
        classes.sort();
        classes.dedup();
        let mut users = self.users.clone();
        users.sort();
        users.dedup();
        Self {
            whole_school: self.whole_school,
            classes,
            users,
            include_parents: self.include_parents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub number: Option<u32>,
    pub date: NaiveDate,
    pub subject: String,
    pub file: String,
    pub attachments: Vec<String>,
    pub audience: Audience,
}

impl NewDocument {
    #[must_use]
    pub fn new(date: NaiveDate, subject: &str, file: &str, audience: Audience) -> Self {
        Self {
            number: None,
            date,
            subject: subject.to_string(),
            file: file.to_string(),
            attachments: Vec::new(),
            audience,
        }
    }

    #[must_use]
    pub fn numbered(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, file: &str) -> Self {
        self.attachments.push(file.to_string());
        self
    }

    pub fn validate(&self) -> Result<Self, ValidationError> {
        let subject = require_text("subject", &self.subject, SUBJECT_MAX_LEN)?;
        let file = require_text("document file", &self.file, FILE_MAX_LEN)?;
        let attachments = self
            .attachments
            .iter()
            .map(|a| require_text("attachment file", a, FILE_MAX_LEN))
            .collect::<Result<Vec<_>, _>>()?;
        if self.number == Some(0) {
            return Err(ValidationError("circular number must be positive".to_string()));
        }
        if self.audience.is_empty() {
            return Err(ValidationError(
                "audience must name the whole school, classes or users".to_string(),
            ));
        }
        Ok(Self {
            number: self.number,
            date: self.date,
            subject,
            file,
            attachments,
            audience: self.audience.normalized(),
        })
    }
}
