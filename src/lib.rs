pub mod cli;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod git;
pub mod github_provider;
pub mod gitlab_provider;
pub mod logging;
pub mod migration;
pub mod orchestrator;
pub mod provider;
pub mod report;
