use crate::domain::model::JobReport;
use crate::domain::ports::SyncJob;
use std::time::Instant;

/// Runs one tick of a job and swallows its failure.
///
/// A failed tick is logged with the remote response body when there is one
/// and returns `None`; the next scheduled tick simply tries again.
pub async fn run_tick(job: &dyn SyncJob) -> Option<JobReport> {
    let started = Instant::now();
    tracing::debug!("{} tick started", job.kind());

    match job.run().await {
        Ok(report) => {
            tracing::info!(
                "{} finished: {} fetched, {} written, {} skipped in {:?}",
                report.job,
                report.fetched,
                report.written,
                report.skipped,
                started.elapsed()
            );
            Some(report)
        }
        Err(e) => {
            tracing::error!("Error {}: {}", job.kind().activity(), e.detail());
            None
        }
    }
}
