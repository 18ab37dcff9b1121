use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

use gitmigrate::cli::{self, Command, MigrationTask, Settings};
use gitmigrate::config::{Config, Credentials, DEFAULT_LOG_FILE};
use gitmigrate::git::GitCli;
use gitmigrate::github_provider::GithubProvider;
use gitmigrate::gitlab_provider::GitlabProvider;
use gitmigrate::logging;
use gitmigrate::migration::Migrator;
use gitmigrate::orchestrator::Orchestrator;
use gitmigrate::report::EXIT_STARTUP;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let (command, settings, guard) = match init() {
        Ok(initialized) => initialized,
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(EXIT_STARTUP);
        }
    };

    let code = match run(command, settings).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            EXIT_STARTUP
        }
    };

    // process::exit skips destructors; flush the log file first.
    drop(guard);
    process::exit(code);
}

fn init() -> Result<(Command, Settings, WorkerGuard)> {
    let (command, settings) = cli::run()?;

    let log_file = settings
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let guard = logging::init_tracing(&log_file)?;

    Ok((command, settings, guard))
}

async fn run(command: Command, settings: Settings) -> Result<i32> {
    let credentials = Credentials::from_env()?;

    // Everything that can abort the run is checked before the first task.
    let tasks = match &command {
        Command::Single {
            source_url,
            destination_owner,
            destination_name,
        } => vec![MigrationTask::new(
            source_url,
            destination_owner,
            destination_name,
        )],
        Command::Bulk {
            destination_owner,
            work_list,
        } => cli::read_work_list(work_list, destination_owner)?,
    };

    let config = Config::new(settings, credentials);

    let git = GitCli::new(&config);
    let destination = GithubProvider::configure_provider(&config)
        .context("could not configure the destination API client")?;
    let releases = GitlabProvider::configure_provider(&config);
    let migrator = Migrator::new(&config, &git, &destination, &releases);
    let orchestrator = Orchestrator::new(&migrator);

    let code = match command {
        Command::Single { .. } => {
            let task = tasks.into_iter().next().context("no task to run")?;
            let result = orchestrator.run_one(task).await;

            info!(
                "Single migration completed: {}",
                if result.is_success() { "Success" } else { "Failed" }
            );
            if let Some(err) = result.error() {
                eprintln!("{} failed [{}]: {}", result.task, err.kind(), err.detail());
            }

            result.exit_code()
        }
        Command::Bulk { .. } => {
            info!("Starting bulk migration for {} repositories", tasks.len());
            let report = orchestrator.run(tasks).await;

            println!("{}", report);

            report.exit_code()
        }
    };

    Ok(code)
}
