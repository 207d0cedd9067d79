//! The simulated lip-sync backend as seen by a UI layer.
//!
//! [`MockBackend`] bundles the job store and the voice store behind the
//! operations a front end calls. Every call is async and pays the configured
//! latency. All state lives in memory for the lifetime of the value.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::catalog::{self, Avatar, Language, Voice};
use crate::config::SimulatorConfig;
use crate::error::Result;
use crate::jobs::JobStore;
use crate::scheduler::Scheduler;
use crate::state_machine::{Job, JobCreationRequest, JobHandle};
use crate::voices::{ClonePolicy, CloneHandle, RandomClonePolicy, VoiceCloneRequest, VoiceStore};

#[derive(Clone)]
pub struct MockBackend {
    jobs: JobStore,
    voices: VoiceStore,
    poll_interval: Duration,
}

impl MockBackend {
    /// Backend with the random 80/20 clone policy from `config`.
    pub fn new(config: &SimulatorConfig) -> Self {
        let policy = Arc::new(RandomClonePolicy::from(&config.clone));
        Self::with_clone_policy(config, policy)
    }

    pub fn with_clone_policy(config: &SimulatorConfig, policy: Arc<dyn ClonePolicy>) -> Self {
        let scheduler = Scheduler::new(config.time_scale);
        Self {
            jobs: JobStore::new(scheduler, &config.latency, config.job_script.clone()),
            voices: VoiceStore::new(scheduler, config.latency.clone(), policy),
            poll_interval: config.poll_interval(),
        }
    }

    pub async fn submit_job(&self, request: JobCreationRequest) -> Result<JobHandle> {
        Ok(self.jobs.submit(request).await)
    }

    /// Fails with `JobNotFound` for ids this backend never issued.
    pub async fn get_job_status(&self, job_id: &str) -> Result<Job> {
        self.jobs.get(job_id).await
    }

    pub async fn list_voices(&self) -> Result<Vec<Voice>> {
        Ok(self.voices.list_voices().await)
    }

    pub async fn list_avatars(&self) -> Result<Vec<Avatar>> {
        Ok(self.voices.list_avatars().await)
    }

    pub async fn clone_voice(&self, request: VoiceCloneRequest) -> Result<CloneHandle> {
        Ok(self.voices.clone_voice(request).await)
    }

    /// Per-id lookup, mainly for following a clone without re-listing.
    pub async fn get_voice(&self, voice_id: &str) -> Result<Voice> {
        self.voices.get_voice(voice_id).await
    }

    pub fn list_languages(&self) -> &'static [Language] {
        catalog::LANGUAGES
    }

    pub fn speaking_styles(&self) -> &'static [&'static str] {
        catalog::SPEAKING_STYLES
    }

    /// Interval a UI should use when polling job status.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Forget all jobs and clones and restore the seed catalogs.
    pub async fn reset(&self) {
        self.jobs.reset().await;
        self.voices.reset().await;
        info!("backend reset to seed data");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CloneStatus, VoiceKind};
    use crate::error::LipSyncError;
    use crate::state_machine::JobStatus;
    use crate::voices::{CloneOutcome, FixedClonePolicy};
    use tokio::time::{Instant, sleep};

    fn backend(outcome: CloneOutcome) -> MockBackend {
        MockBackend::with_clone_policy(
            &SimulatorConfig::default(),
            Arc::new(FixedClonePolicy {
                delay: Duration::from_millis(12_500),
                outcome,
            }),
        )
    }

    fn request(video: &str) -> JobCreationRequest {
        JobCreationRequest::new(video, "en").with_audio("a.mp3")
    }

    #[tokio::test(start_paused = true)]
    async fn failing_video_ends_failed() {
        let backend = backend(CloneOutcome::Available);
        let start = Instant::now();

        let handle = backend.submit_job(request("fail_case_1.mp4")).await.unwrap();
        assert_eq!(handle.status, JobStatus::Accepted);

        sleep(Duration::from_millis(6_600) - start.elapsed()).await;
        let job = backend.get_job_status(&handle.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(!job.error_message.unwrap_or_default().is_empty());
        assert!(job.output_url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn ok_video_ends_completed() {
        let backend = backend(CloneOutcome::Available);
        let start = Instant::now();

        let handle = backend.submit_job(request("ok.mp4")).await.unwrap();
        sleep(Duration::from_millis(8_100) - start.elapsed()).await;

        let job = backend.get_job_status(&handle.id).await.unwrap();
        assert!(start.elapsed() <= Duration::from_millis(8_500));
        assert_eq!(job.status, JobStatus::Completed);
        assert!(!job.output_url.unwrap_or_default().is_empty());
        let seconds = job.processing_time_seconds.unwrap();
        assert!((seconds - 7.5).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_job_id_is_not_found() {
        let backend = backend(CloneOutcome::Available);
        let err = backend.get_job_status("job_001").await.unwrap_err();
        assert!(matches!(err, LipSyncError::JobNotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn snapshots_are_copies() {
        let backend = backend(CloneOutcome::Available);
        let handle = backend.submit_job(request("ok.mp4")).await.unwrap();

        let mut snapshot = backend.get_job_status(&handle.id).await.unwrap();
        snapshot.status = JobStatus::Completed;
        snapshot.progress = 100;

        let fresh = backend.get_job_status(&handle.id).await.unwrap();
        assert_eq!(fresh.status, JobStatus::Accepted);
        assert_eq!(fresh.progress, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn clone_outcome_visible_by_relisting() {
        let backend = backend(CloneOutcome::Failed);
        let before = backend.list_voices().await.unwrap();

        let handle = backend
            .clone_voice(VoiceCloneRequest::new("s.mp3", "X"))
            .await
            .unwrap();
        assert_eq!(handle.status, CloneStatus::Pending);
        assert!(before.iter().all(|v| v.id != handle.voice_id));

        let listed = backend.list_voices().await.unwrap();
        let voice = listed.iter().find(|v| v.id == handle.voice_id).unwrap();
        assert_eq!(voice.kind, VoiceKind::Cloned);
        assert!(voice.description.contains("CLONING_PENDING"));

        sleep(Duration::from_secs(15)).await;
        let listed = backend.list_voices().await.unwrap();
        let voice = listed.iter().find(|v| v.id == handle.voice_id).unwrap();
        assert!(voice.description.contains("CLONING_FAILED"));
        assert_eq!(voice.clone_status, Some(CloneStatus::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn random_policy_always_settles() {
        let backend = MockBackend::new(&SimulatorConfig::default());
        let handle = backend
            .clone_voice(VoiceCloneRequest::new("s.mp3", "X"))
            .await
            .unwrap();

        sleep(Duration::from_secs(16)).await;
        let voice = backend.get_voice(&handle.voice_id).await.unwrap();
        assert_ne!(voice.clone_status, Some(CloneStatus::Pending));
        assert!(!voice.description.contains("CLONING_PENDING"));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restores_seed_state() {
        let backend = backend(CloneOutcome::Available);
        let job = backend.submit_job(request("ok.mp4")).await.unwrap();
        backend
            .clone_voice(VoiceCloneRequest::new("s.mp3", "X"))
            .await
            .unwrap();

        backend.reset().await;

        assert!(backend.get_job_status(&job.id).await.is_err());
        assert_eq!(backend.list_voices().await.unwrap().len(), 4);
        assert_eq!(backend.list_avatars().await.unwrap().len(), 3);
        let again = backend.submit_job(request("ok.mp4")).await.unwrap();
        assert_eq!(again.id, "job_001");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_time_scale_is_instant() {
        let config = SimulatorConfig {
            time_scale: 0.0,
            ..Default::default()
        };
        let backend = MockBackend::new(&config);
        let start = Instant::now();

        let handle = backend.submit_job(request("ok.mp4")).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        // Let the spawned script run to completion without advancing the clock.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let job = backend.get_job_status(&handle.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.processing_time_seconds, Some(7.5));
    }

    #[tokio::test(start_paused = true)]
    async fn unvalidated_nan_success_rate_settles_failed() {
        let mut config = SimulatorConfig::default();
        config.clone.success_rate = f64::NAN;
        let backend = MockBackend::new(&config);

        let handle = backend
            .clone_voice(VoiceCloneRequest::new("s.mp3", "X"))
            .await
            .unwrap();
        sleep(Duration::from_secs(16)).await;

        let voice = backend.get_voice(&handle.voice_id).await.unwrap();
        assert_eq!(voice.clone_status, Some(CloneStatus::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn unvalidated_huge_time_scale_does_not_panic() {
        let config = SimulatorConfig {
            time_scale: 1e20,
            ..Default::default()
        };
        let backend = MockBackend::new(&config);

        let submitted = tokio::time::timeout(
            Duration::from_secs(60),
            backend.submit_job(request("ok.mp4")),
        )
        .await;
        assert!(submitted.is_err());
    }

    #[test]
    fn static_catalogs() {
        let backend = backend(CloneOutcome::Available);
        assert_eq!(backend.list_languages().len(), 10);
        assert!(backend.speaking_styles().contains(&"Whisper"));
        assert_eq!(backend.poll_interval(), Duration::from_millis(3000));
    }
}
