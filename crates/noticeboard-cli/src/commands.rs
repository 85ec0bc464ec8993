// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use noticeboard_core::{ClassId, UserId};
use std::path::PathBuf;

#[derive(Subcommand)]
pub(crate) enum UserCommand {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        /// student, parent, ata, teacher or staff
        #[arg(long)]
        role: String,
        #[arg(long, default_value_t = false)]
        secretary: bool,
        #[arg(long)]
        class: Option<ClassId>,
        #[arg(long)]
        parent_of: Option<UserId>,
    },
    Disable {
        user: UserId,
    },
    Move {
        user: UserId,
        /// Omit to withdraw the student from any class.
        #[arg(long)]
        class: Option<ClassId>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ClassCommand {
    Add {
        #[arg(long)]
        year: u8,
        #[arg(long)]
        section: String,
        #[arg(long)]
        coordinator: Option<UserId>,
    },
}

#[derive(Subcommand)]
pub(crate) enum DraftCommand {
    Create {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        file: String,
        #[arg(long)]
        number: Option<u32>,
        #[arg(long = "attachment")]
        attachments: Vec<String>,
        #[arg(long, default_value_t = false)]
        whole_school: bool,
        #[arg(long = "class")]
        classes: Vec<ClassId>,
        #[arg(long = "user")]
        users: Vec<UserId>,
        #[arg(long, default_value_t = false)]
        include_parents: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum AudienceCli {
    All,
    Targeted,
    Unread,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LoginKindCli {
    Password,
    GoogleWorkspace,
}

#[derive(clap::Args)]
pub(crate) struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Defaults to the configured page size.
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(clap::Args)]
pub(crate) struct ArchiveArgs {
    #[arg(long)]
    pub documents_dir: Option<PathBuf>,
    #[arg(long)]
    pub archive_root: Option<PathBuf>,
}
