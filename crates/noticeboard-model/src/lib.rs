// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Domain types for circular distribution and read tracking.
//!
//! Role polymorphism is a [`Role`] tag plus flags (`secretary` on the user,
//! coordination derived from [`Class::coordinator`]) rather than a type
//! hierarchy.

mod acknowledgment;
mod class;
mod document;
mod listing;
mod role;
mod session;
mod statistics;
mod user;
mod validation;

pub use acknowledgment::{ClassAcknowledgment, RecipientAcknowledgment};
pub use class::{Class, NewClass, SECTION_MAX_LEN};
pub use document::{Audience, Document, NewDocument, PublicationState, SUBJECT_MAX_LEN};
pub use listing::{AudienceFilter, Page, YearMonth};
pub use role::Role;
pub use session::{LoginKind, RequestContext};
pub use statistics::{Category, ClassTally, ReadStatistics, Tally};
pub use user::{NewUser, User};
pub use validation::ValidationError;

pub use noticeboard_core::{ClassId, DocumentId, UserId};

pub const CRATE_NAME: &str = "noticeboard-model";
