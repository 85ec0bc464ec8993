// SPDX-License-Identifier: Apache-2.0

//! Circular tracking operations over a noticeboard SQLite store:
//! numbering, distribution, acknowledgments, statistics and listings.

#![forbid(unsafe_code)]

mod acknowledgment;
mod archive;
mod distribution;
mod listing;
mod notification;
mod publication;
mod query_error;
mod reading;
mod sequence;
mod session;
mod statistics;

pub use acknowledgment::{acknowledge_as_class_representative, acknowledge_as_individual, mark_read};
pub use archive::{archive_file_name, archive_published, ArchiveReport, ArchiveRequest, ARCHIVE_SUBDIR};
pub use distribution::{resolve_distribution, DistributionReport};
pub use listing::{
    list_for_user, search_published, ListedDocument, ListingLimits, PublishedSearch, UserListing,
};
pub use notification::pending_recipients;
pub use publication::{create_draft, drafts, publish, redistribute, Publication};
pub use query_error::{QueryError, QueryErrorCode};
pub use reading::{unread_count_for_class, unread_count_for_user, unread_for_class};
pub use sequence::{is_sequence_number_available, next_sequence_number};
pub use session::establish_session;
pub use statistics::{class_tally, compute_statistics, fold_role_groups, role_groups, RoleGroup};

pub const CRATE_NAME: &str = "noticeboard-query";
