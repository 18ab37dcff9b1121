use async_trait::async_trait;
use serde::Deserialize;

use crate::{cli::DestinationRepository, config::RepositorySettings, error::ApiError};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RemoteRepository {
    pub full_name: String,
    pub clone_url: String,
}

/// Result of asking the destination platform to create a repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(RemoteRepository),
    AlreadyExists,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
    pub name: String,
    pub description: String,
}

/// Destination platform API.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Login of the account the destination token belongs to.
    async fn authenticated_login(&self) -> Result<String, ApiError>;

    async fn create_repository(
        &self,
        destination: &DestinationRepository,
    ) -> Result<CreateOutcome, ApiError>;

    async fn get_repository(
        &self,
        destination: &DestinationRepository,
    ) -> Result<RemoteRepository, ApiError>;

    async fn create_release(
        &self,
        destination: &DestinationRepository,
        release: &Release,
    ) -> Result<(), ApiError>;

    async fn update_settings(
        &self,
        destination: &DestinationRepository,
        settings: &RepositorySettings,
    ) -> Result<(), ApiError>;

    async fn grant_team_access(
        &self,
        destination: &DestinationRepository,
        team_slug: &str,
    ) -> Result<(), ApiError>;
}

/// Source platform API, used only for metadata that git does not carry.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn list_releases(&self, source_url: &str) -> Result<Vec<Release>, ApiError>;
}
