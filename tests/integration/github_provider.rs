use crate::mocks::github::{
    create_release_mock, create_repository_mock, create_repository_with_body_mock,
    get_repository_mock, get_user_mock, team_access_mock, update_settings_mock,
};

use gitmigrate::{
    cli::{DestinationRepository, Settings},
    config::{OwnerKind, RepositorySettings, Visibility},
    error::ApiError,
    fixtures::{
        config::get_config,
        content::{get_already_exists_json, get_error_json, get_repository_json, get_user_json},
    },
    github_provider::GithubProvider,
    provider::{CreateOutcome, Provider, Release, RemoteRepository},
};
use serde_json::json;
use wiremock::MockServer;

mod create_repository {

    use super::*;

    #[tokio::test]
    async fn created_for_user() {
        let mock_server = MockServer::start().await;
        let destination = DestinationRepository::new("octocat", "repoA");

        create_repository_with_body_mock(
            None,
            json!({
                "name": "repoA",
                "private": true,
                "description": "",
                "auto_init": false,
            }),
            get_repository_json(
                "octocat",
                "repoA",
                "https://github.com/octocat/repoA.git",
            ),
        )
        .mount(&mock_server)
        .await;

        let config = get_config(&mock_server.uri(), Settings::default());
        let github_provider = GithubProvider::configure_provider(&config).unwrap();

        let outcome = github_provider
            .create_repository(&destination)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CreateOutcome::Created(RemoteRepository {
                full_name: "octocat/repoA".to_string(),
                clone_url: "https://github.com/octocat/repoA.git".to_string(),
            })
        );

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn created_for_org_with_visibility() {
        let mock_server = MockServer::start().await;
        let destination = DestinationRepository::new("acme", "repoA");

        create_repository_with_body_mock(
            Some("acme"),
            json!({
                "name": "repoA",
                "private": false,
                "description": "moved from gitlab",
                "auto_init": false,
            }),
            get_repository_json("acme", "repoA", "https://github.com/acme/repoA.git"),
        )
        .mount(&mock_server)
        .await;

        let config = get_config(
            &mock_server.uri(),
            Settings {
                owner_type: Some(OwnerKind::Org),
                visibility: Some(Visibility::Public),
                description: Some("moved from gitlab".to_string()),
                ..Settings::default()
            },
        );
        let github_provider = GithubProvider::configure_provider(&config).unwrap();

        let outcome = github_provider
            .create_repository(&destination)
            .await
            .unwrap();

        assert!(matches!(outcome, CreateOutcome::Created(_)));

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn already_exists() {
        let mock_server = MockServer::start().await;
        let destination = DestinationRepository::new("acme", "repoA");

        create_repository_mock(Some("acme"), 422, get_already_exists_json())
            .mount(&mock_server)
            .await;

        let config = get_config(
            &mock_server.uri(),
            Settings {
                owner_type: Some(OwnerKind::Org),
                ..Settings::default()
            },
        );
        let github_provider = GithubProvider::configure_provider(&config).unwrap();

        let outcome = github_provider
            .create_repository(&destination)
            .await
            .unwrap();

        assert_eq!(outcome, CreateOutcome::AlreadyExists);

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn bad_credentials() {
        let mock_server = MockServer::start().await;
        let destination = DestinationRepository::new("octocat", "repoA");

        create_repository_mock(None, 401, get_error_json("Bad credentials", json!([])))
            .mount(&mock_server)
            .await;

        let config = get_config(&mock_server.uri(), Settings::default());
        let github_provider = GithubProvider::configure_provider(&config).unwrap();

        let err = github_provider
            .create_repository(&destination)
            .await
            .unwrap_err();

        match err {
            ApiError::Unauthorized { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Bad credentials");
            }
            other => panic!("unexpected error {:?}", other),
        }

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn other_validation_failure() {
        let mock_server = MockServer::start().await;
        let destination = DestinationRepository::new("acme", "bad name");

        create_repository_mock(
            Some("acme"),
            422,
            get_error_json(
                "Repository creation failed.",
                json!([{ "resource": "Repository", "code": "invalid", "field": "name" }]),
            ),
        )
        .mount(&mock_server)
        .await;

        let config = get_config(
            &mock_server.uri(),
            Settings {
                owner_type: Some(OwnerKind::Org),
                ..Settings::default()
            },
        );
        let github_provider = GithubProvider::configure_provider(&config).unwrap();

        let err = github_provider
            .create_repository(&destination)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 422, .. }));

        mock_server.verify().await;
    }
}

#[tokio::test]
async fn get_repository() {
    let mock_server = MockServer::start().await;
    let destination = DestinationRepository::new("acme", "repoA");

    get_repository_mock(
        "acme",
        "repoA",
        get_repository_json("acme", "repoA", "https://github.com/acme/repoA.git"),
    )
    .mount(&mock_server)
    .await;

    let config = get_config(&mock_server.uri(), Settings::default());
    let github_provider = GithubProvider::configure_provider(&config).unwrap();

    let repository = github_provider.get_repository(&destination).await.unwrap();

    assert_eq!(repository.clone_url, "https://github.com/acme/repoA.git");

    mock_server.verify().await;
}

#[tokio::test]
async fn authenticated_login() {
    let mock_server = MockServer::start().await;

    get_user_mock(200, get_user_json("octocat"))
        .mount(&mock_server)
        .await;

    let config = get_config(&mock_server.uri(), Settings::default());
    let github_provider = GithubProvider::configure_provider(&config).unwrap();

    assert_eq!(github_provider.authenticated_login().await.unwrap(), "octocat");

    mock_server.verify().await;
}

#[tokio::test]
async fn repository_extras() {
    let mock_server = MockServer::start().await;
    let destination = DestinationRepository::new("acme", "repoA");
    let settings = RepositorySettings {
        has_wiki: false,
        ..RepositorySettings::default()
    };

    create_release_mock(
        "acme",
        "repoA",
        json!({
            "tag_name": "v1.0.0",
            "name": "First release",
            "body": "notes",
            "draft": false,
            "prerelease": false,
        }),
    )
    .mount(&mock_server)
    .await;
    update_settings_mock(
        "acme",
        "repoA",
        json!({
            "has_issues": true,
            "has_projects": true,
            "has_wiki": false,
            "allow_squash_merge": true,
            "allow_merge_commit": true,
            "allow_rebase_merge": true,
            "delete_branch_on_merge": false,
        }),
    )
    .mount(&mock_server)
    .await;
    team_access_mock("acme", "platform", "repoA")
        .mount(&mock_server)
        .await;

    let config = get_config(&mock_server.uri(), Settings::default());
    let github_provider = GithubProvider::configure_provider(&config).unwrap();

    github_provider
        .create_release(
            &destination,
            &Release {
                tag_name: "v1.0.0".to_string(),
                name: "First release".to_string(),
                description: "notes".to_string(),
            },
        )
        .await
        .unwrap();
    github_provider
        .update_settings(&destination, &settings)
        .await
        .unwrap();
    github_provider
        .grant_team_access(&destination, "platform")
        .await
        .unwrap();

    mock_server.verify().await;
}
