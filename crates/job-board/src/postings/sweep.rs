use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::PostId;
use super::repository::{JobPostRepository, MemberDirectory, NotificationPublisher};
use super::service::{JobPostService, JobPostServiceError};

/// Outcome of one expiration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub evaluated_on: NaiveDate,
    pub closed: Vec<PostId>,
    pub failed: Vec<SweepFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    pub post_id: PostId,
    pub error: String,
}

/// Closes every open posting whose deadline has passed.
///
/// Deadlines are calendar dates: a posting stays open through its deadline day and is
/// closed by the first sweep evaluated on a later date. Wall-clock triggering belongs to
/// the caller, which invokes [`ExpirationSweep::run_expiration_sweep`] on its own schedule.
pub struct ExpirationSweep<R, M, N> {
    service: Arc<JobPostService<R, M, N>>,
}

impl<R, M, N> ExpirationSweep<R, M, N>
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(service: Arc<JobPostService<R, M, N>>) -> Self {
        Self { service }
    }

    /// Sweep as of the service clock's current date.
    pub fn run_expiration_sweep(&self) -> Result<SweepReport, JobPostServiceError> {
        let today = self.service.clock().today();
        self.run(today)
    }

    /// Sweep as of `today`. A failure on one posting is recorded and the rest still close.
    pub fn run(&self, today: NaiveDate) -> Result<SweepReport, JobPostServiceError> {
        let expired = self.service.find_expired_job_posts(today)?;
        let mut report = SweepReport {
            evaluated_on: today,
            closed: Vec::new(),
            failed: Vec::new(),
        };

        for post in expired {
            match self.service.close_job_post(post.id) {
                Ok(()) => report.closed.push(post.id),
                Err(err) => {
                    warn!(post_id = %post.id, error = %err, "failed to close expired job post");
                    report.failed.push(SweepFailure {
                        post_id: post.id,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            %today,
            closed = report.closed.len(),
            failed = report.failed.len(),
            "expiration sweep finished"
        );
        Ok(report)
    }
}
