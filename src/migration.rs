use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::cli::{DestinationRepository, MigrationTask};
use crate::config::{Config, ExistingRepositoryPolicy, OwnerKind};
use crate::error::{ApiError, TransferError};
use crate::git::{redact, GitMirror};
use crate::provider::{CreateOutcome, Provider, ReleaseSource, RemoteRepository};

/// A single repository transfer. Implemented by [`Migrator`]; the
/// orchestrator only depends on this seam.
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn transfer(&self, task: &MigrationTask) -> Result<(), TransferError>;
}

pub struct Migrator<'a> {
    config: &'a Config,
    git: &'a dyn GitMirror,
    destination: &'a dyn Provider,
    releases: &'a dyn ReleaseSource,
}

impl<'a> Migrator<'a> {
    pub fn new(
        config: &'a Config,
        git: &'a dyn GitMirror,
        destination: &'a dyn Provider,
        releases: &'a dyn ReleaseSource,
    ) -> Self {
        Migrator {
            config,
            git,
            destination,
            releases,
        }
    }

    fn redacted(&self, error: &ApiError) -> String {
        redact(
            &error.to_string(),
            &[
                self.config.credentials.source_token.as_str(),
                self.config.credentials.destination_token.as_str(),
            ],
        )
    }

    fn create_error(&self, error: ApiError) -> TransferError {
        let detail = self.redacted(&error);
        match error {
            ApiError::Unauthorized { .. } => TransferError::AuthenticationFailure(detail),
            _ => TransferError::DestinationCreateFailure(detail),
        }
    }

    async fn check_owner(&self, destination: &DestinationRepository) -> Result<(), TransferError> {
        let login = self
            .destination
            .authenticated_login()
            .await
            .map_err(|e| self.create_error(e))?;

        if !login.eq_ignore_ascii_case(&destination.owner) {
            return Err(TransferError::DestinationCreateFailure(format!(
                "destination token belongs to `{}`, not `{}`; use --owner-type org for organizations",
                login, destination.owner
            )));
        }

        Ok(())
    }

    async fn ensure_destination(
        &self,
        destination: &DestinationRepository,
    ) -> Result<RemoteRepository, TransferError> {
        if self.config.owner_kind == OwnerKind::User {
            self.check_owner(destination).await?;
        }

        let outcome = self
            .destination
            .create_repository(destination)
            .await
            .map_err(|e| self.create_error(e))?;

        match (outcome, self.config.existing_repository) {
            (CreateOutcome::Created(repository), _) => {
                info!(repository = %repository.full_name, "destination repository created");
                Ok(repository)
            }
            (CreateOutcome::AlreadyExists, ExistingRepositoryPolicy::Proceed) => {
                info!("destination repository already exists, pushing into it");
                self.destination
                    .get_repository(destination)
                    .await
                    .map_err(|e| self.create_error(e))
            }
            (CreateOutcome::AlreadyExists, ExistingRepositoryPolicy::Fail) => {
                Err(TransferError::DestinationCreateFailure(format!(
                    "{} already exists",
                    destination
                )))
            }
        }
    }

    async fn copy_releases(&self, task: &MigrationTask) {
        let releases = match self.releases.list_releases(&task.source_url).await {
            Ok(releases) => releases,
            Err(e) => {
                warn!(error = %self.redacted(&e), "could not fetch source releases, skipping");
                return;
            }
        };

        if releases.is_empty() {
            info!("no source releases found");
            return;
        }

        info!(count = releases.len(), "copying releases");
        for release in &releases {
            if let Err(e) = self
                .destination
                .create_release(&task.destination, release)
                .await
            {
                warn!(tag = %release.tag_name, error = %self.redacted(&e), "failed to create release");
            }
        }
    }

    async fn finish_destination(&self, task: &MigrationTask) {
        if self.config.copy_releases {
            self.copy_releases(task).await;
        }

        if self.config.apply_settings {
            match self
                .destination
                .update_settings(&task.destination, &self.config.repository_settings)
                .await
            {
                Ok(()) => info!("repository settings updated"),
                Err(e) => warn!(error = %self.redacted(&e), "failed to update repository settings"),
            }
        }

        if let (Some(team), OwnerKind::Org) = (&self.config.team, self.config.owner_kind) {
            match self
                .destination
                .grant_team_access(&task.destination, team)
                .await
            {
                Ok(()) => info!(%team, "team push access granted"),
                Err(e) => warn!(%team, error = %self.redacted(&e), "failed to grant team access"),
            }
        }
    }
}

#[async_trait]
impl Transfer for Migrator<'_> {
    #[instrument(skip_all, fields(source = %task.source_url, destination = %task.destination))]
    async fn transfer(&self, task: &MigrationTask) -> Result<(), TransferError> {
        // The source is cloned first so an unreachable source never leaves an
        // empty destination repository behind.
        let mirror = self.git.clone_mirror(&task.source_url).await?;

        let repository = self.ensure_destination(&task.destination).await?;

        self.git.push_mirror(&mirror, &repository.clone_url).await?;
        info!("all refs pushed");

        self.finish_destination(task).await;

        info!("repository migrated");
        Ok(())
    }
}
