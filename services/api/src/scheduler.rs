use job_board::postings::{
    ExpirationSweep, JobPostRepository, MemberDirectory, NotificationPublisher,
};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, info};

/// Register the expiration sweep on `schedule` (six-field cron, UTC) and start the scheduler.
///
/// A failed run is logged; the next tick runs normally.
pub(crate) async fn start_expiration_scheduler<R, M, N>(
    sweep: Arc<ExpirationSweep<R, M, N>>,
    schedule: &str,
) -> Result<JobScheduler, JobSchedulerError>
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let sweep = sweep.clone();
        Box::pin(async move {
            match sweep.run_expiration_sweep() {
                Ok(report) => info!(
                    closed = report.closed.len(),
                    failed = report.failed.len(),
                    "scheduled expiration sweep completed"
                ),
                Err(err) => error!(error = %err, "scheduled expiration sweep failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!(schedule, "expiration sweep scheduled");
    Ok(scheduler)
}
