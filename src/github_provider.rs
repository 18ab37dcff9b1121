use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::DestinationRepository;
use crate::config::{Config, OwnerKind, RepositorySettings, Visibility};
use crate::error::ApiError;
use crate::provider::{CreateOutcome, Provider, Release, RemoteRepository};

pub struct GithubProvider {
    instance: Octocrab,
    owner_kind: OwnerKind,
    visibility: Visibility,
    description: String,
}

#[derive(Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
    private: bool,
    description: &'a str,
    auto_init: bool,
}

#[derive(Serialize)]
struct CreateReleaseRequest<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

#[derive(Serialize)]
struct TeamPermissionRequest<'a> {
    permission: &'a str,
}

#[derive(Deserialize)]
struct AuthenticatedUser {
    login: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorItem {
    code: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn is_already_exists(&self) -> bool {
        self.errors.iter().any(|item| {
            item.code.as_deref() == Some("already_exists")
                || item
                    .message
                    .as_deref()
                    .map_or(false, |m| m.contains("already exists"))
        })
    }

    fn describe(&self) -> String {
        let details: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|item| item.message.as_deref())
            .collect();

        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, details.join("; "))
        }
    }
}

impl GithubProvider {
    pub fn configure_provider(config: &Config) -> Result<Self, ApiError> {
        // Routes are joined relative to the base, which keeps enterprise
        // prefixes such as `/api/v3` intact.
        let mut base_url = config.destination_api_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let instance = Octocrab::builder()
            .personal_token(config.credentials.destination_token.clone())
            .base_url(base_url.as_str())?
            .build()?;

        Ok(GithubProvider {
            instance,
            owner_kind: config.owner_kind,
            visibility: config.visibility,
            description: config.description.clone(),
        })
    }

    fn create_route(&self, destination: &DestinationRepository) -> String {
        match self.owner_kind {
            OwnerKind::Org => format!("orgs/{}/repos", destination.owner),
            OwnerKind::User => "user/repos".to_string(),
        }
    }

    async fn read_error(response: Response) -> (StatusCode, ErrorBody) {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| ErrorBody {
            message: text,
            errors: Vec::new(),
        });

        (status, body)
    }

    fn into_api_error(status: StatusCode, body: &ErrorBody) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized {
                status: status.as_u16(),
                message: body.describe(),
            },
            _ => ApiError::Status {
                status: status.as_u16(),
                message: body.describe(),
            },
        }
    }

    async fn expect_success(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let (status, body) = Self::read_error(response).await;
        Err(Self::into_api_error(status, &body))
    }
}

#[async_trait]
impl Provider for GithubProvider {
    async fn authenticated_login(&self) -> Result<String, ApiError> {
        let url = self.instance.absolute_url("user")?;
        let response = self.instance._get(url, None::<&()>).await?;

        let user: AuthenticatedUser = Self::expect_success(response).await?.json().await?;

        Ok(user.login)
    }

    async fn create_repository(
        &self,
        destination: &DestinationRepository,
    ) -> Result<CreateOutcome, ApiError> {
        let url = self.instance.absolute_url(self.create_route(destination))?;
        let request = CreateRepositoryRequest {
            name: &destination.name,
            private: self.visibility == Visibility::Private,
            description: &self.description,
            auto_init: false,
        };

        debug!(%url, "creating repository");
        let response = self.instance._post(url, Some(&request)).await?;

        if response.status().is_success() {
            let repository: RemoteRepository = response.json().await?;
            return Ok(CreateOutcome::Created(repository));
        }

        let (status, body) = Self::read_error(response).await;
        if status == StatusCode::UNPROCESSABLE_ENTITY && body.is_already_exists() {
            return Ok(CreateOutcome::AlreadyExists);
        }

        Err(Self::into_api_error(status, &body))
    }

    async fn get_repository(
        &self,
        destination: &DestinationRepository,
    ) -> Result<RemoteRepository, ApiError> {
        let url = self
            .instance
            .absolute_url(format!("repos/{}/{}", destination.owner, destination.name))?;
        let response = self.instance._get(url, None::<&()>).await?;

        let repository = Self::expect_success(response).await?.json().await?;

        Ok(repository)
    }

    async fn create_release(
        &self,
        destination: &DestinationRepository,
        release: &Release,
    ) -> Result<(), ApiError> {
        let url = self.instance.absolute_url(format!(
            "repos/{}/{}/releases",
            destination.owner, destination.name
        ))?;
        let request = CreateReleaseRequest {
            tag_name: &release.tag_name,
            name: &release.name,
            body: &release.description,
            draft: false,
            prerelease: false,
        };

        let response = self.instance._post(url, Some(&request)).await?;
        Self::expect_success(response).await?;

        Ok(())
    }

    async fn update_settings(
        &self,
        destination: &DestinationRepository,
        settings: &RepositorySettings,
    ) -> Result<(), ApiError> {
        let url = self
            .instance
            .absolute_url(format!("repos/{}/{}", destination.owner, destination.name))?;

        let response = self.instance._patch(url, Some(settings)).await?;
        Self::expect_success(response).await?;

        Ok(())
    }

    async fn grant_team_access(
        &self,
        destination: &DestinationRepository,
        team_slug: &str,
    ) -> Result<(), ApiError> {
        let url = self.instance.absolute_url(format!(
            "orgs/{org}/teams/{team}/repos/{org}/{repo}",
            org = destination.owner,
            team = team_slug,
            repo = destination.name
        ))?;

        let response = self
            .instance
            ._put(url, Some(&TeamPermissionRequest { permission: "push" }))
            .await?;
        Self::expect_success(response).await?;

        Ok(())
    }
}
