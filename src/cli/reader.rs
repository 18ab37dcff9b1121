use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use serde_yaml;

use crate::config::{ExistingRepositoryPolicy, OwnerKind, RefScope, RepositorySettings, Visibility};

/// Optional settings file. Every field may be overridden on the command line.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub source_api_url: Option<String>,
    pub destination_api_url: Option<String>,
    pub owner_type: Option<OwnerKind>,
    pub visibility: Option<Visibility>,
    pub description: Option<String>,
    pub team: Option<String>,
    pub on_existing: Option<ExistingRepositoryPolicy>,
    pub ref_scope: Option<RefScope>,
    pub copy_releases: Option<bool>,
    pub apply_settings: Option<bool>,
    pub repository_settings: Option<RepositorySettings>,
    pub log_file: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
}

pub fn read_config(config: &str) -> Result<Settings> {
    if config.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(config)?;

    Ok(settings)
}
