// SPDX-License-Identifier: Apache-2.0

use noticeboard_model::ValidationError;
use noticeboard_store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryErrorCode {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Io,
    Store,
}

impl QueryErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unauthorized => "unauthorized",
            Self::Io => "io",
            Self::Store => "store",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub code: QueryErrorCode,
    pub message: String,
}

impl QueryError {
    #[must_use]
    pub fn new(code: QueryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::NotFound, message)
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::Conflict, message)
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
impl std::error::Error for QueryError {}

impl From<StoreError> for QueryError {
    fn from(value: StoreError) -> Self {
        Self::new(QueryErrorCode::Store, value.0)
    }
}

impl From<rusqlite::Error> for QueryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::new(QueryErrorCode::Store, value.to_string())
    }
}

impl From<ValidationError> for QueryError {
    fn from(value: ValidationError) -> Self {
        Self::new(QueryErrorCode::Validation, value.0)
    }
}

impl From<noticeboard_core::Error> for QueryError {
    fn from(value: noticeboard_core::Error) -> Self {
        Self::new(QueryErrorCode::Validation, value.to_string())
    }
}

impl From<std::io::Error> for QueryError {
    fn from(value: std::io::Error) -> Self {
        Self::new(QueryErrorCode::Io, value.to_string())
    }
}
