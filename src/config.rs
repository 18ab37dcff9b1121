use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::reader::Settings;

pub const SOURCE_TOKEN_VAR: &str = "GITLAB_TOKEN";
pub const DESTINATION_TOKEN_VAR: &str = "GITHUB_TOKEN";

pub const DEFAULT_SOURCE_API_URL: &str = "https://gitlab.com/api/v4";
pub const DEFAULT_DESTINATION_API_URL: &str = "https://api.github.com";
pub const DEFAULT_LOG_FILE: &str = "migration.log";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not found. Set it in your .env file or environment")]
    MissingCredential(&'static str),
}

/// Who owns destination repositories. Organization repositories are created
/// under `/orgs/{owner}/repos`, user repositories under `/user/repos`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OwnerKind {
    User,
    Org,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    Private,
    Public,
}

/// What to do when the destination repository already exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExistingRepositoryPolicy {
    /// Push into the existing repository.
    Proceed,
    /// Record the task as a DestinationCreateFailure.
    Fail,
}

/// Which refs are pushed to the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RefScope {
    BranchesAndTags,
    All,
}

/// Settings patched onto every destination repository after the push.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub allow_squash_merge: bool,
    pub allow_merge_commit: bool,
    pub allow_rebase_merge: bool,
    pub delete_branch_on_merge: bool,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        RepositorySettings {
            has_issues: true,
            has_projects: true,
            has_wiki: true,
            allow_squash_merge: true,
            allow_merge_commit: true,
            allow_rebase_merge: true,
            delete_branch_on_merge: false,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub source_token: String,
    pub destination_token: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingCredential(key))
        };

        Ok(Credentials {
            source_token: read(SOURCE_TOKEN_VAR)?,
            destination_token: read(DESTINATION_TOKEN_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("source_token", &"***")
            .field("destination_token", &"***")
            .finish()
    }
}

/// Immutable run configuration, built once at startup and shared by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub credentials: Credentials,
    pub source_api_url: String,
    pub destination_api_url: String,
    pub owner_kind: OwnerKind,
    pub visibility: Visibility,
    pub description: String,
    pub team: Option<String>,
    pub existing_repository: ExistingRepositoryPolicy,
    pub ref_scope: RefScope,
    pub copy_releases: bool,
    pub apply_settings: bool,
    pub repository_settings: RepositorySettings,
    pub work_dir: Option<PathBuf>,
}

impl Config {
    pub fn new(settings: Settings, credentials: Credentials) -> Self {
        Config {
            credentials,
            source_api_url: settings
                .source_api_url
                .unwrap_or_else(|| DEFAULT_SOURCE_API_URL.to_string()),
            destination_api_url: settings
                .destination_api_url
                .unwrap_or_else(|| DEFAULT_DESTINATION_API_URL.to_string()),
            owner_kind: settings.owner_type.unwrap_or(OwnerKind::User),
            visibility: settings.visibility.unwrap_or(Visibility::Private),
            description: settings.description.unwrap_or_default(),
            team: settings.team,
            existing_repository: settings
                .on_existing
                .unwrap_or(ExistingRepositoryPolicy::Proceed),
            ref_scope: settings.ref_scope.unwrap_or(RefScope::BranchesAndTags),
            copy_releases: settings.copy_releases.unwrap_or(true),
            apply_settings: settings.apply_settings.unwrap_or(true),
            repository_settings: settings.repository_settings.unwrap_or_default(),
            work_dir: settings.work_dir,
        }
    }
}
