// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use noticeboard_core::{ClassId, UserId};
use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::validation::{require_text, ValidationError};

pub const USERNAME_MAX_LEN: usize = 128;
pub const FULL_NAME_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    /// Only meaningful for [`Role::Ata`]: the school secretary (DSGA).
    pub secretary: bool,
    pub enabled: bool,
    /// Current class for students.
    pub class: Option<ClassId>,
    /// Student a parent account belongs to.
    pub child: Option<UserId>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub secretary: bool,
    pub class: Option<ClassId>,
    pub child: Option<UserId>,
}

impl NewUser {
    #[must_use]
    pub fn new(username: &str, full_name: &str, email: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            role,
            secretary: false,
            class: None,
            child: None,
        }
    }

    #[must_use]
    pub fn secretary(mut self) -> Self {
        self.secretary = true;
        self
    }

    #[must_use]
    pub fn in_class(mut self, class: ClassId) -> Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn parent_of(mut self, child: UserId) -> Self {
        self.child = Some(child);
        self
    }

    /// Returns a normalized copy; emails are lowercased for login lookup.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        let username = require_text("username", &self.username, USERNAME_MAX_LEN)?;
        let full_name = require_text("full name", &self.full_name, FULL_NAME_MAX_LEN)?;
        let email = self.email.trim().to_ascii_lowercase();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(ValidationError(format!("invalid email `{email}`"))),
        }
        if self.secretary && self.role != Role::Ata {
            return Err(ValidationError(
                "only ata staff can be flagged as secretary".to_string(),
            ));
        }
        if self.class.is_some() && self.role != Role::Student {
            return Err(ValidationError("only students belong to a class".to_string()));
        }
        if self.child.is_some() && self.role != Role::Parent {
            return Err(ValidationError("only parents reference a child".to_string()));
        }
        Ok(Self {
            username,
            full_name,
            email,
            ..self.clone()
        })
    }
}
