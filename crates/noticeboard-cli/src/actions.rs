// SPDX-License-Identifier: Apache-2.0

use noticeboard_core::{ClassId, SystemClock, UserId};
use noticeboard_model::{
    Audience, AudienceFilter, Category, LoginKind, NewClass, NewDocument, NewUser,
    ReadStatistics, Role, YearMonth,
};
use noticeboard_query::{
    acknowledge_as_class_representative, acknowledge_as_individual, archive_published,
    compute_statistics, create_draft, drafts, establish_session, is_sequence_number_available,
    list_for_user, mark_read, next_sequence_number, pending_recipients, publish, redistribute,
    search_published, unread_count_for_class, unread_count_for_user, unread_for_class,
    ArchiveRequest, ListingLimits, PublishedSearch, UserListing,
};
use noticeboard_store::{
    insert_class, insert_user, open, set_coordinator, set_school_year, set_user_class,
    set_user_enabled, SQLITE_SCHEMA_VERSION,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::debug;

use crate::commands::{
    ArchiveArgs, AudienceCli, ClassCommand, DraftCommand, LoginKindCli, PageArgs, UserCommand,
};
use crate::config::TrackerConfig;
use crate::{CliError, Commands};

fn to_value<T: Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::internal(e.to_string()))
}

/// Raw buckets plus a per-category `summary` with pending counts and
/// rounded-down percentages.
fn statistics_report(stats: &ReadStatistics) -> Result<Value, CliError> {
    let summary: Vec<Value> = Category::ALL
        .into_iter()
        .map(|category| {
            let tally = stats.tally(category);
            json!({
                "category": category,
                "total": tally.total,
                "acknowledged": tally.acknowledged,
                "pending": tally.pending(),
                "percent": tally.percent(),
            })
        })
        .collect();
    let mut report = to_value(stats)?;
    report["summary"] = Value::Array(summary);
    Ok(report)
}

fn page_of(args: &PageArgs, config: &TrackerConfig) -> (u32, u32) {
    (args.page, args.limit.unwrap_or(config.page_size))
}

pub(crate) fn dispatch(
    command: Commands,
    db: &Path,
    school_year_flag: Option<&str>,
) -> Result<Value, CliError> {
    let mut conn = open(db)?;
    let config = TrackerConfig::load(&conn, school_year_flag).map_err(CliError::validation)?;
    debug!(db = %db.display(), school_year = ?config.school_year, "configuration resolved");
    let clock = SystemClock;

    match command {
        Commands::Init => init(&conn, db, &config),
        Commands::User { command } => user(&conn, command),
        Commands::Class { command } => class(&conn, command),
        Commands::Draft { command } => draft(&mut conn, command),
        Commands::Publish { document } => {
            let school_year = config.require_school_year().map_err(CliError::validation)?;
            to_value(&publish(&mut conn, document, school_year)?)
        }
        Commands::Redistribute { document } => to_value(&redistribute(&mut conn, document)?),
        Commands::NextNumber => Ok(json!({ "next_number": next_sequence_number(&conn)? })),
        Commands::CheckNumber { number, exclude } => {
            let school_year = config.require_school_year().map_err(CliError::validation)?;
            let available = is_sequence_number_available(&conn, number, exclude, school_year)?;
            Ok(json!({
                "number": number,
                "school_year": school_year,
                "available": available,
            }))
        }
        Commands::Ack { document, user } => {
            let confirmed = acknowledge_as_individual(&conn, document, user, &clock)?;
            Ok(json!({ "document": document, "user": user, "confirmed": confirmed }))
        }
        Commands::AckClass { class, document } => {
            let marked = acknowledge_as_class_representative(&mut conn, class, document, &clock)?;
            Ok(json!({ "class": class, "acknowledged": to_value(&marked)? }))
        }
        Commands::MarkRead { document, user } => {
            let read = mark_read(&conn, document, user, &clock)?;
            Ok(json!({ "document": document, "user": user, "marked": read }))
        }
        Commands::Stats { document } => statistics_report(&compute_statistics(&conn, document)?),
        Commands::Pending { document } => {
            let pending = pending_recipients(&conn, document)?;
            Ok(json!({ "document": document, "pending": pending }))
        }
        Commands::Unread { class, user } => unread(&conn, class, user),
        Commands::List {
            user,
            audience,
            month,
            subject,
            page,
        } => {
            let listing = UserListing {
                audience: match audience {
                    AudienceCli::All => AudienceFilter::All,
                    AudienceCli::Targeted => AudienceFilter::Targeted,
                    AudienceCli::Unread => AudienceFilter::Unread,
                },
                month: month
                    .as_deref()
                    .map(YearMonth::parse)
                    .transpose()
                    .map_err(|e| CliError::validation(e.0))?,
                subject,
            };
            let (page, limit) = page_of(&page, &config);
            let listed =
                list_for_user(&conn, &listing, user, page, limit, &ListingLimits::default())?;
            to_value(&listed)
        }
        Commands::Search {
            from,
            to,
            subject,
            page,
        } => {
            let search = PublishedSearch { from, to, subject };
            let (page, limit) = page_of(&page, &config);
            to_value(&search_published(
                &conn,
                &search,
                page,
                limit,
                &ListingLimits::default(),
            )?)
        }
        Commands::Drafts => to_value(&drafts(&conn)?),
        Commands::Archive { args } => archive(&conn, args, &config),
        Commands::Login { email, kind } => {
            let login = match kind {
                LoginKindCli::Password => LoginKind::Password,
                LoginKindCli::GoogleWorkspace => LoginKind::GoogleWorkspace,
            };
            to_value(&establish_session(&conn, &email, login, &clock)?)
        }
    }
}

fn init(conn: &Connection, db: &Path, config: &TrackerConfig) -> Result<Value, CliError> {
    if let Some(school_year) = config.school_year {
        set_school_year(conn, school_year)?;
    }
    Ok(json!({
        "db": db,
        "schema_version": SQLITE_SCHEMA_VERSION,
        "school_year": config.school_year,
    }))
}

fn user(conn: &Connection, command: UserCommand) -> Result<Value, CliError> {
    match command {
        UserCommand::Add {
            username,
            full_name,
            email,
            role,
            secretary,
            class,
            parent_of,
        } => {
            let role = Role::parse(&role).map_err(|e| CliError::validation(e.0))?;
            let mut new_user = NewUser::new(&username, &full_name, &email, role);
            if secretary {
                new_user = new_user.secretary();
            }
            if let Some(class) = class {
                new_user = new_user.in_class(class);
            }
            if let Some(child) = parent_of {
                new_user = new_user.parent_of(child);
            }
            let id = insert_user(conn, &new_user)?;
            Ok(json!({ "user": id, "username": username, "role": role }))
        }
        UserCommand::Disable { user } => {
            set_user_enabled(conn, user, false)?;
            Ok(json!({ "user": user, "enabled": false }))
        }
        UserCommand::Move { user, class } => {
            set_user_class(conn, user, class)?;
            Ok(json!({ "user": user, "class": class }))
        }
    }
}

fn class(conn: &Connection, command: ClassCommand) -> Result<Value, CliError> {
    match command {
        ClassCommand::Add {
            year,
            section,
            coordinator,
        } => {
            let new_class =
                NewClass::parse(year, &section).map_err(|e| CliError::validation(e.0))?;
            let id = insert_class(conn, &new_class)?;
            if coordinator.is_some() {
                set_coordinator(conn, id, coordinator)?;
            }
            Ok(json!({
                "class": id,
                "name": format!("{}{}", new_class.year, new_class.section),
                "coordinator": coordinator,
            }))
        }
    }
}

fn draft(conn: &mut Connection, command: DraftCommand) -> Result<Value, CliError> {
    match command {
        DraftCommand::Create {
            date,
            subject,
            file,
            number,
            attachments,
            whole_school,
            classes,
            users,
            include_parents,
        } => {
            let mut audience = if whole_school {
                Audience::whole_school()
            } else {
                Audience::default()
            };
            audience = audience.with_classes(classes).with_users(users);
            if include_parents {
                audience = audience.with_parents();
            }
            let mut document = NewDocument::new(date, &subject, &file, audience);
            if let Some(number) = number {
                document = document.numbered(number);
            }
            for attachment in &attachments {
                document = document.with_attachment(attachment);
            }
            let id = create_draft(conn, &document)?;
            Ok(json!({ "document": id, "state": "draft" }))
        }
    }
}

fn unread(
    conn: &Connection,
    class: Option<ClassId>,
    user: Option<UserId>,
) -> Result<Value, CliError> {
    match (class, user) {
        (Some(class), _) => Ok(json!({
            "class": class,
            "count": unread_count_for_class(conn, class)?,
            "documents": to_value(&unread_for_class(conn, class)?)?,
        })),
        (None, Some(user)) => Ok(json!({
            "user": user,
            "count": unread_count_for_user(conn, user)?,
        })),
        (None, None) => Err(CliError::usage("pass --class or --user")),
    }
}

fn archive(conn: &Connection, args: ArchiveArgs, config: &TrackerConfig) -> Result<Value, CliError> {
    let request = ArchiveRequest {
        documents_dir: args
            .documents_dir
            .unwrap_or_else(|| config.documents_dir.clone()),
        archive_root: args
            .archive_root
            .unwrap_or_else(|| config.archive_root.clone()),
    };
    to_value(&archive_published(conn, &request)?)
}
