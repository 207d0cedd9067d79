//! Client-side status polling.
//!
//! The backend never pushes updates. Observers read a job on a fixed interval
//! until it reaches a terminal status; stopping early has no effect on the job.

use std::future::Future;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use crate::backend::MockBackend;
use crate::error::Result;
use crate::state_machine::Job;

/// Anything that can report a job snapshot by id.
pub trait StatusSource {
    fn job_status(&self, job_id: &str) -> impl Future<Output = Result<Job>> + Send;
}

impl StatusSource for MockBackend {
    fn job_status(&self, job_id: &str) -> impl Future<Output = Result<Job>> + Send {
        self.get_job_status(job_id)
    }
}

/// Read `job_id` every `every` until it is COMPLETED or FAILED.
///
/// `on_update` sees every snapshot, including the terminal one, which is also
/// returned. Lookup errors end polling immediately.
pub async fn poll_until_terminal<S, F>(
    source: &S,
    job_id: &str,
    every: Duration,
    mut on_update: F,
) -> Result<Job>
where
    S: StatusSource,
    F: FnMut(&Job),
{
    let mut ticker = interval(every.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let job = source.job_status(job_id).await?;
        debug!(job_id, status = %job.status, progress = job.progress, "polled job");
        on_update(&job);
        if job.is_terminal() {
            return Ok(job);
        }
    }
}
