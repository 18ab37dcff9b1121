use std::path::{Path, PathBuf};
use std::process::Output;

use crate::migrate::{git_available, path_str, refs, repositories};
use crate::mocks::github::create_repository_mock;

use gitmigrate::{
    fixtures::{
        config::{DESTINATION_TOKEN, SOURCE_TOKEN},
        content::get_repository_json,
    },
    report::{EXIT_STARTUP, EXIT_SUCCESS, EXIT_TASK_FAILED},
};
use indoc::formatdoc;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::MockServer;

fn log_path(dir: &TempDir) -> PathBuf {
    dir.path().join("migration.log")
}

fn gitmigrate(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gitmigrate"));
    cmd.current_dir(dir.path())
        .env("GITLAB_TOKEN", SOURCE_TOKEN)
        .env("GITHUB_TOKEN", DESTINATION_TOKEN)
        .env("RUST_LOG", "info")
        .arg("--log-file")
        .arg(log_path(dir));
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn read_log(dir: &TempDir) -> String {
    std::fs::read_to_string(log_path(dir)).unwrap_or_default()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test]
async fn empty_work_list_succeeds() {
    let dir = TempDir::new().unwrap();
    let work_list = write(&dir, "repos.txt", "# nothing to migrate yet\n\n");

    let output = gitmigrate(&dir)
        .arg("bulk")
        .arg("acme")
        .arg(&work_list)
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    assert!(stdout(&output).contains("0 succeeded, 0 failed, 0 total"));
}

#[tokio::test]
async fn malformed_work_list_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let work_list = write(
        &dir,
        "repos.txt",
        "https://git.example/a.git repoA\nhttps://git.example/b.git, repoB\n",
    );

    let output = gitmigrate(&dir)
        .arg("bulk")
        .arg("acme")
        .arg(&work_list)
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(EXIT_STARTUP));
    assert!(!stdout(&output).contains("Migration Report"));

    let log = read_log(&dir);
    assert!(log.contains("line 1: expected `source_url, destination_name`"));
    assert!(!log.contains("starting migration"));
}

#[tokio::test]
async fn missing_work_list_is_logged() {
    let dir = TempDir::new().unwrap();

    let output = gitmigrate(&dir)
        .arg("bulk")
        .arg("acme")
        .arg(dir.path().join("absent.txt"))
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(EXIT_STARTUP));
    assert!(read_log(&dir).contains("could not read work list"));
}

#[tokio::test]
async fn missing_credentials_are_logged() {
    let dir = TempDir::new().unwrap();
    let work_list = write(&dir, "repos.txt", "https://git.example/a.git, repoA\n");

    let output = gitmigrate(&dir)
        .env_remove("GITLAB_TOKEN")
        .arg("bulk")
        .arg("acme")
        .arg(&work_list)
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(EXIT_STARTUP));

    let log = read_log(&dir);
    assert!(log.contains("GITLAB_TOKEN not found"));
    assert!(!log.contains("starting migration"));
}

fn settings_file(dir: &TempDir, server: &MockServer, work_dir: &Path) -> PathBuf {
    write(
        dir,
        "settings.yml",
        &formatdoc! {r#"
            source_api_url: "{uri}/api/v4"
            destination_api_url: "{uri}"
            owner_type: org
            copy_releases: false
            apply_settings: false
            work_dir: "{work_dir}"
            "#,
            uri = server.uri(),
            work_dir = path_str(work_dir),
        },
    )
}

#[tokio::test]
async fn one_unreachable_source_fails_the_run() {
    if !git_available() {
        return;
    }

    let dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let (source, destination) = repositories(&dir);
    let missing = dir.path().join("bad.git");

    let mock_server = MockServer::start().await;
    create_repository_mock(
        Some("acme"),
        201,
        get_repository_json("acme", "repoA", &path_str(&destination)),
    )
    .mount(&mock_server)
    .await;

    let settings = settings_file(&dir, &mock_server, work_dir.path());
    let work_list = write(
        &dir,
        "repos.txt",
        &format!(
            "{}, repoA\n{}, repoB\n",
            path_str(&source),
            path_str(&missing)
        ),
    );

    let output = gitmigrate(&dir)
        .arg("--config")
        .arg(&settings)
        .arg("bulk")
        .arg("acme")
        .arg(&work_list)
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(EXIT_TASK_FAILED));

    let printed = stdout(&output);
    assert!(printed.contains("1 succeeded, 1 failed, 2 total"));
    assert!(printed.contains("[SourceUnreachable]"));
    assert_eq!(refs(&source), refs(&destination));

    mock_server.verify().await;
}
