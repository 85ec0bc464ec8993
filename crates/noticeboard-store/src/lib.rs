// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod rows;
mod schema;
mod settings;
mod writes;

use noticeboard_model::ValidationError;
use std::fmt::{Display, Formatter};

pub use rows::{
    class_from_row, document_from_row, load_audience, load_class, load_class_acknowledgment,
    load_document, load_recipient_acknowledgment, load_user, load_user_by_email,
    recipient_ack_from_row, user_from_row, CLASS_COLUMNS, DOCUMENT_COLUMNS, RECIPIENT_ACK_COLUMNS, USER_COLUMNS,
};
pub use schema::{apply_schema, open, open_in_memory, SQLITE_SCHEMA_VERSION};
pub use settings::{get_setting, put_setting, school_year, set_school_year, SETTING_SCHOOL_YEAR};
pub use writes::{
    insert_class, insert_draft, insert_draft_rows, insert_user, record_login, set_coordinator, set_user_class,
    set_user_enabled,
};

pub const CRATE_NAME: &str = "noticeboard-store";

#[derive(Debug)]
pub struct StoreError(pub String);

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self(value.to_string())
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self(value.0)
    }
}
