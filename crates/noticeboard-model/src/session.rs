use chrono::{DateTime, Utc};
use noticeboard_core::UserId;
use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginKind {
    Password,
    GoogleWorkspace,
}

/// Request-scoped identity handed to handlers explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub user: UserId,
    pub role: Role,
    pub login: LoginKind,
    /// Login before this one, if any.
    pub previous_login: Option<DateTime<Utc>>,
}
