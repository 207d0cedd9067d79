//! Job store and the timed script that drives each job to a terminal status.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{JobScriptConfig, LatencyConfig};
use crate::error::{LipSyncError, Result};
use crate::ids::IdSequence;
use crate::scheduler::{Scheduler, Step};
use crate::state_machine::{Job, JobCreationRequest, JobHandle, StateMachine, Transition};

/// Build the fixed script for one job.
///
/// Two PROCESSING steps (25%, 60%), then FAILED if the video source contains
/// the failure marker, otherwise COMPLETED. The reported processing time is the
/// unscaled sum of the submission latency and every delay on the success path.
pub fn job_script(
    config: &JobScriptConfig,
    submit_latency_ms: u64,
    request: &JobCreationRequest,
) -> Vec<Step<Transition>> {
    let mut steps = vec![
        Step::after_ms(config.to_processing_ms, Transition::Advance { progress: 25 }),
        Step::after_ms(config.to_midway_ms, Transition::Advance { progress: 60 }),
    ];

    let marked = !config.failure_marker.is_empty()
        && request.video_input_url.contains(&config.failure_marker);

    if marked {
        steps.push(Step::after_ms(
            config.to_failed_ms,
            Transition::Fail {
                error_message: config.error_message.clone(),
            },
        ));
    } else {
        let total_ms = submit_latency_ms
            + config.to_processing_ms
            + config.to_midway_ms
            + config.to_completed_ms;
        steps.push(Step::after_ms(
            config.to_completed_ms,
            Transition::Complete {
                output_url: config.output_url.clone(),
                processing_time_seconds: total_ms as f64 / 1000.0,
            },
        ));
    }

    steps
}

#[derive(Debug)]
struct JobTable {
    jobs: HashMap<String, Job>,
    ids: IdSequence,
    /// Bumped on reset so scripts of discarded jobs stop touching reused ids.
    epoch: u64,
}

/// Owns every job record. Callers only ever see clones.
#[derive(Debug, Clone)]
pub struct JobStore {
    table: Arc<RwLock<JobTable>>,
    scheduler: Scheduler,
    script: JobScriptConfig,
    submit_latency_ms: u64,
    status_latency_ms: u64,
}

impl JobStore {
    pub fn new(scheduler: Scheduler, latency: &LatencyConfig, script: JobScriptConfig) -> Self {
        Self {
            table: Arc::new(RwLock::new(JobTable {
                jobs: HashMap::new(),
                ids: IdSequence::new("job", 1),
                epoch: 0,
            })),
            scheduler,
            script,
            submit_latency_ms: latency.submit_ms,
            status_latency_ms: latency.status_ms,
        }
    }

    /// Accept a job and start its script. Resolves after the submission latency.
    pub async fn submit(&self, request: JobCreationRequest) -> JobHandle {
        self.scheduler.delay_ms(self.submit_latency_ms).await;

        let script = job_script(&self.script, self.submit_latency_ms, &request);
        let (handle, epoch) = {
            let mut table = self.table.write().await;
            let id = table.ids.next_id();
            let job = Job::accepted(id, request);
            let handle = job.handle();
            table.jobs.insert(handle.id.clone(), job);
            (handle, table.epoch)
        };

        info!(job_id = %handle.id, steps = script.len(), "job accepted");
        self.spawn_script(handle.id.clone(), epoch, script);
        handle
    }

    fn spawn_script(&self, job_id: String, epoch: u64, script: Vec<Step<Transition>>) {
        let table = Arc::clone(&self.table);
        self.scheduler.run(script, move |transition| {
            let table = Arc::clone(&table);
            let job_id = job_id.clone();
            async move {
                let mut table = table.write().await;
                if table.epoch != epoch {
                    debug!(job_id = %job_id, "store was reset, dropping script");
                    return false;
                }
                let Some(job) = table.jobs.get_mut(&job_id) else {
                    return false;
                };
                match StateMachine::apply(job, transition) {
                    Ok(status) => {
                        info!(job_id = %job_id, %status, progress = job.progress, "job advanced");
                        !status.is_terminal()
                    }
                    Err(e) => {
                        warn!(job_id = %job_id, error = %e, "discarding script step");
                        false
                    }
                }
            }
        });
    }

    /// Current snapshot of a job.
    pub async fn get(&self, job_id: &str) -> Result<Job> {
        self.scheduler.delay_ms(self.status_latency_ms).await;
        self.table
            .read()
            .await
            .jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| LipSyncError::JobNotFound(job_id.to_string()))
    }

    /// Drop every job and restart numbering. Scripts already running become no-ops.
    pub async fn reset(&self) {
        let mut table = self.table.write().await;
        table.jobs.clear();
        table.ids.reset();
        table.epoch += 1;
        debug!(epoch = table.epoch, "job store reset");
    }
}
