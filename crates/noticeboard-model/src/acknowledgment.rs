// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use noticeboard_core::{ClassId, DocumentId, UserId};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Per-recipient read state. Fields are private: there is no setter, so a
/// confirmation can only be written by the store's guarded update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientAcknowledgment {
    document: DocumentId,
    user: UserId,
    read_at: Option<DateTime<Utc>>,
    confirmed_at: Option<DateTime<Utc>>,
}

impl RecipientAcknowledgment {
    pub fn from_parts(
        document: DocumentId,
        user: UserId,
        read_at: Option<DateTime<Utc>>,
        confirmed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        if confirmed_at.is_some() && read_at.is_none() {
            return Err(ValidationError(format!(
                "acknowledgment of document {document} by user {user} is confirmed but unread"
            )));
        }
        Ok(Self {
            document,
            user,
            read_at,
            confirmed_at,
        })
    }

    #[must_use]
    pub const fn document(&self) -> DocumentId {
        self.document
    }

    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    #[must_use]
    pub const fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    #[must_use]
    pub const fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

/// Class-level mark set when a representative reads a circular to the class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAcknowledgment {
    document: DocumentId,
    class: ClassId,
    read_at: Option<DateTime<Utc>>,
}

impl ClassAcknowledgment {
    #[must_use]
    pub const fn from_parts(
        document: DocumentId,
        class: ClassId,
        read_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            document,
            class,
            read_at,
        }
    }

    #[must_use]
    pub const fn document(&self) -> DocumentId {
        self.document
    }

    #[must_use]
    pub const fn class(&self) -> ClassId {
        self.class
    }

    #[must_use]
    pub const fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }
}
