use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::config::Config;
use crate::error::ApiError;
use crate::provider::{Release, ReleaseSource};

pub struct GitlabProvider {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct GitlabRelease {
    tag_name: String,
    name: Option<String>,
    description: Option<String>,
}

impl From<GitlabRelease> for Release {
    fn from(release: GitlabRelease) -> Self {
        Release {
            name: release
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| release.tag_name.clone()),
            description: release.description.unwrap_or_default(),
            tag_name: release.tag_name,
        }
    }
}

impl GitlabProvider {
    pub fn configure_provider(config: &Config) -> Self {
        GitlabProvider {
            client: reqwest::Client::new(),
            api_url: config.source_api_url.trim_end_matches('/').to_string(),
            token: config.credentials.source_token.clone(),
        }
    }
}

/// URL-encoded project path (`group%2Fsub%2Frepo`) of a clone URL, as the
/// GitLab projects API expects it.
pub fn project_path(source_url: &str) -> Option<String> {
    let url = Url::parse(source_url).ok()?;

    let path = url.path().trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() {
        return None;
    }

    Some(path.replace('/', "%2F"))
}

#[async_trait]
impl ReleaseSource for GitlabProvider {
    async fn list_releases(&self, source_url: &str) -> Result<Vec<Release>, ApiError> {
        let project = project_path(source_url).ok_or_else(|| {
            ApiError::Decode(format!("`{}` does not name a project", source_url))
        })?;
        let url = format!("{}/projects/{}/releases", self.api_url, project);

        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED => ApiError::Unauthorized {
                    status: status.as_u16(),
                    message,
                },
                _ => ApiError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let releases: Vec<GitlabRelease> = response.json().await?;

        Ok(releases.into_iter().map(Release::from).collect())
    }
}
