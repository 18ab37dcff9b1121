pub mod common;
pub mod parser;
pub mod reader;

pub use common::*;
pub use parser::{parse_work_list, read_work_list, WorkListError};
pub use reader::Settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reader::read_config;

use crate::config::{ExistingRepositoryPolicy, OwnerKind, RefScope, Visibility};

/// Migrate repositories, with all branches, tags and history, from GitLab to GitHub.
#[derive(Debug, Parser)]
#[clap(name = "gitmigrate", version)]
pub struct Args {
    /// YAML settings file
    #[clap(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(flatten)]
    pub overrides: Overrides,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Migrate one repository
    Single {
        source_url: String,
        destination_owner: String,
        destination_name: String,
    },
    /// Migrate every `source_url, destination_name` entry of a work list file
    Bulk {
        destination_owner: String,
        work_list: PathBuf,
    },
}

/// Command line values that take precedence over the settings file.
#[derive(Debug, Default, clap::Args)]
pub struct Overrides {
    #[clap(long, value_enum, global = true)]
    pub owner_type: Option<OwnerKind>,

    #[clap(long, value_enum, global = true)]
    pub visibility: Option<Visibility>,

    #[clap(long, global = true)]
    pub description: Option<String>,

    /// Organization team granted push access to every migrated repository
    #[clap(long, global = true)]
    pub team: Option<String>,

    #[clap(long, value_enum, global = true)]
    pub on_existing: Option<ExistingRepositoryPolicy>,

    #[clap(long, value_enum, global = true)]
    pub ref_scope: Option<RefScope>,

    /// Skip copying source releases
    #[clap(long, global = true)]
    pub no_releases: bool,

    /// Skip patching destination repository settings
    #[clap(long, global = true)]
    pub no_settings: bool,

    #[clap(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, mut settings: Settings) -> Settings {
        if self.owner_type.is_some() {
            settings.owner_type = self.owner_type;
        }
        if self.visibility.is_some() {
            settings.visibility = self.visibility;
        }
        if self.description.is_some() {
            settings.description = self.description;
        }
        if self.team.is_some() {
            settings.team = self.team;
        }
        if self.on_existing.is_some() {
            settings.on_existing = self.on_existing;
        }
        if self.ref_scope.is_some() {
            settings.ref_scope = self.ref_scope;
        }
        if self.no_releases {
            settings.copy_releases = Some(false);
        }
        if self.no_settings {
            settings.apply_settings = Some(false);
        }
        if self.log_file.is_some() {
            settings.log_file = self.log_file;
        }

        settings
    }
}

/// Parses the command line and merges it over the settings file.
pub fn run() -> Result<(Command, Settings)> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => {
            let result = std::fs::read_to_string(path)
                .with_context(|| format!("could not read file `{:?}`", path))?;

            read_config(&result).with_context(|| format!("invalid settings file `{:?}`", path))?
        }
        None => Settings::default(),
    };

    Ok((args.command, args.overrides.apply(settings)))
}
