use chrono::Utc;
use thiserror::Error;

use super::job::{Job, JobStatus};

/// One mutation in a job's timed script.
///
/// Jobs flow through: ACCEPTED → PROCESSING → COMPLETED | FAILED
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Enter (or stay in) PROCESSING at the given progress.
    Advance { progress: u8 },
    /// Terminal failure.
    Fail { error_message: String },
    /// Terminal success.
    Complete {
        output_url: String,
        processing_time_seconds: f64,
    },
}

impl Transition {
    pub fn target(&self) -> JobStatus {
        match self {
            Transition::Advance { .. } => JobStatus::Processing,
            Transition::Fail { .. } => JobStatus::Failed,
            Transition::Complete { .. } => JobStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("job is already {0} and cannot change")]
    Terminal(JobStatus),

    #[error("cannot move from {from} to {to}")]
    Skipped { from: JobStatus, to: JobStatus },

    #[error("progress would drop from {from} to {to}")]
    ProgressRegressed { from: u8, to: u8 },
}

/// Applies script transitions to a job, enforcing the lifecycle.
pub struct StateMachine;

impl StateMachine {
    /// Apply `transition` to `job` in place and return the resulting status.
    ///
    /// - `Advance` is allowed from ACCEPTED or PROCESSING.
    /// - `Fail` and `Complete` are allowed only from PROCESSING and set progress to 100.
    /// - Terminal statuses reject everything.
    /// - Progress never decreases.
    ///
    /// On error the job is left untouched.
    pub fn apply(job: &mut Job, transition: Transition) -> Result<JobStatus, TransitionError> {
        let from = job.status;
        let to = transition.target();

        if from.is_terminal() {
            return Err(TransitionError::Terminal(from));
        }

        let allowed = match to {
            JobStatus::Processing => matches!(from, JobStatus::Accepted | JobStatus::Processing),
            _ => from == JobStatus::Processing,
        };
        if !allowed {
            return Err(TransitionError::Skipped { from, to });
        }

        let progress = match &transition {
            Transition::Advance { progress } => (*progress).min(100),
            _ => 100,
        };
        if progress < job.progress {
            return Err(TransitionError::ProgressRegressed {
                from: job.progress,
                to: progress,
            });
        }

        match transition {
            Transition::Advance { .. } => {}
            Transition::Fail { error_message } => {
                job.error_message = Some(error_message);
            }
            Transition::Complete {
                output_url,
                processing_time_seconds,
            } => {
                job.output_url = Some(output_url);
                job.processing_time_seconds = Some(processing_time_seconds);
            }
        }

        job.progress = progress;
        job.status = to;
        if job.status_history.last() != Some(&to) {
            job.status_history.push(to);
        }
        job.updated_at = Utc::now();

        Ok(to)
    }
}
