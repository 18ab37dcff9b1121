use tracing::{error, info};

use crate::cli::MigrationTask;
use crate::migration::Transfer;
use crate::report::{MigrationReport, MigrationResult};

/// Runs tasks one at a time, in input order. A failed transfer is recorded and
/// never stops the batch.
pub struct Orchestrator<'a, T: Transfer + ?Sized> {
    transfer: &'a T,
}

impl<'a, T: Transfer + ?Sized> Orchestrator<'a, T> {
    pub fn new(transfer: &'a T) -> Self {
        Orchestrator { transfer }
    }

    pub async fn run_one(&self, task: MigrationTask) -> MigrationResult {
        info!(%task, "starting migration");

        let result = self.transfer.transfer(&task).await;
        match &result {
            Ok(()) => info!(%task, "migration succeeded"),
            Err(err) => error!(%task, kind = %err.kind(), error = %err, "migration failed"),
        }

        MigrationResult::from_transfer(task, result)
    }

    pub async fn run(&self, tasks: Vec<MigrationTask>) -> MigrationReport {
        let total = tasks.len();
        info!(total, "starting bulk migration");

        let mut results = Vec::with_capacity(total);
        for (index, task) in tasks.into_iter().enumerate() {
            info!("[{}/{}]", index + 1, total);
            results.push(self.run_one(task).await);
        }

        let report = MigrationReport::new(results);
        info!(
            succeeded = report.successes(),
            failed = report.failures(),
            "bulk migration finished"
        );

        report
    }
}
