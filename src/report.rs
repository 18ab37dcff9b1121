use std::fmt;

use crate::cli::MigrationTask;
use crate::error::TransferError;

/// Process exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_TASK_FAILED: i32 = 1;
/// Nothing was attempted: bad arguments, settings, credentials or work list.
pub const EXIT_STARTUP: i32 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(TransferError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationResult {
    pub task: MigrationTask,
    pub outcome: Outcome,
}

impl MigrationResult {
    pub fn from_transfer(task: MigrationTask, result: Result<(), TransferError>) -> Self {
        let outcome = match result {
            Ok(()) => Outcome::Success,
            Err(err) => Outcome::Failure(err),
        };

        MigrationResult { task, outcome }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success)
    }

    pub fn error(&self) -> Option<&TransferError> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure(err) => Some(err),
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error().map(TransferError::detail)
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_TASK_FAILED
        }
    }
}

/// Summary over every result of a run, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationReport {
    results: Vec<MigrationResult>,
}

impl MigrationReport {
    pub fn new(results: Vec<MigrationResult>) -> Self {
        MigrationReport { results }
    }

    pub fn results(&self) -> &[MigrationResult] {
        &self.results
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.total() - self.successes()
    }

    pub fn failed(&self) -> impl Iterator<Item = &MigrationResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures() == 0
    }

    /// An empty run counts as success.
    pub fn exit_code(&self) -> i32 {
        if self.all_succeeded() {
            EXIT_SUCCESS
        } else {
            EXIT_TASK_FAILED
        }
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Migration Report =====")?;
        writeln!(
            f,
            "{} succeeded, {} failed, {} total",
            self.successes(),
            self.failures(),
            self.total()
        )?;

        for result in &self.results {
            match &result.outcome {
                Outcome::Success => writeln!(f, "  ok      {}", result.task)?,
                Outcome::Failure(err) => writeln!(
                    f,
                    "  FAILED  {} [{}] {}",
                    result.task,
                    err.kind(),
                    err.detail()
                )?,
            }
        }

        write!(f, "============================")
    }
}
