//! Voice catalog with simulated cloning, plus the static avatar catalog.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::catalog::{self, Avatar, CloneStatus, Voice, VoiceKind};
use crate::config::{CloneConfig, LatencyConfig};
use crate::error::{LipSyncError, Result};
use crate::ids::IdSequence;
use crate::scheduler::{Scheduler, Step};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCloneRequest {
    #[serde(rename = "audio_sample_url")]
    pub sample_url: String,
    pub voice_name: String,
    /// Languages to optimise for; defaults to English when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_languages: Option<Vec<String>>,
}

impl VoiceCloneRequest {
    pub fn new(sample_url: impl Into<String>, voice_name: impl Into<String>) -> Self {
        Self {
            sample_url: sample_url.into(),
            voice_name: voice_name.into(),
            target_languages: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneHandle {
    pub voice_id: String,
    pub status: CloneStatus,
}

/// Final result of a cloning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    Available,
    Failed,
}

impl From<CloneOutcome> for CloneStatus {
    fn from(outcome: CloneOutcome) -> Self {
        match outcome {
            CloneOutcome::Available => CloneStatus::Available,
            CloneOutcome::Failed => CloneStatus::Failed,
        }
    }
}

/// Decides how long a clone takes and how it ends.
pub trait ClonePolicy: Send + Sync {
    fn delay(&self) -> Duration;
    fn outcome(&self) -> CloneOutcome;
}

/// Uniform delay in `[min_delay_ms, max_delay_ms]`, success with probability `success_rate`.
#[derive(Debug, Clone)]
pub struct RandomClonePolicy {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub success_rate: f64,
}

impl RandomClonePolicy {
    /// `success_rate` clamped to [0, 1]; NaN counts as certain failure.
    pub fn success_probability(&self) -> f64 {
        if self.success_rate.is_nan() {
            0.0
        } else {
            self.success_rate.clamp(0.0, 1.0)
        }
    }
}

impl From<&CloneConfig> for RandomClonePolicy {
    fn from(config: &CloneConfig) -> Self {
        Self {
            min_delay_ms: config.min_delay_ms,
            max_delay_ms: config.max_delay_ms,
            success_rate: config.success_rate,
        }
    }
}

impl ClonePolicy for RandomClonePolicy {
    fn delay(&self) -> Duration {
        let hi = self.max_delay_ms.max(self.min_delay_ms);
        Duration::from_millis(rand::thread_rng().gen_range(self.min_delay_ms..=hi))
    }

    fn outcome(&self) -> CloneOutcome {
        if rand::thread_rng().gen_bool(self.success_probability()) {
            CloneOutcome::Available
        } else {
            CloneOutcome::Failed
        }
    }
}

/// Always the same delay and outcome.
#[derive(Debug, Clone)]
pub struct FixedClonePolicy {
    pub delay: Duration,
    pub outcome: CloneOutcome,
}

impl ClonePolicy for FixedClonePolicy {
    fn delay(&self) -> Duration {
        self.delay
    }

    fn outcome(&self) -> CloneOutcome {
        self.outcome
    }
}

fn pending_description(request: &VoiceCloneRequest) -> String {
    format!(
        "User cloned voice: {}. Original sample: {}. (Status: {})",
        request.voice_name,
        request.sample_url,
        CloneStatus::Pending
    )
}

fn settled_description(voice_name: &str, status: CloneStatus) -> String {
    format!("User cloned voice: {voice_name}. (Status: {status})")
}

#[derive(Debug)]
struct VoiceTable {
    voices: Vec<Voice>,
    avatars: Vec<Avatar>,
    ids: IdSequence,
    epoch: u64,
}

impl VoiceTable {
    fn seeded() -> Self {
        let voices = catalog::seed_voices();
        let first_clone = voices.len() as u32 + 1;
        Self {
            voices,
            avatars: catalog::seed_avatars(),
            ids: IdSequence::new("cloned_voice", first_clone),
            epoch: 0,
        }
    }
}

/// Owns voice and avatar records. Cloned voices are appended and later
/// settled in place by a single delayed step.
#[derive(Clone)]
pub struct VoiceStore {
    table: Arc<RwLock<VoiceTable>>,
    scheduler: Scheduler,
    policy: Arc<dyn ClonePolicy>,
    latency: LatencyConfig,
}

impl VoiceStore {
    pub fn new(scheduler: Scheduler, latency: LatencyConfig, policy: Arc<dyn ClonePolicy>) -> Self {
        Self {
            table: Arc::new(RwLock::new(VoiceTable::seeded())),
            scheduler,
            policy,
            latency,
        }
    }

    pub async fn list_voices(&self) -> Vec<Voice> {
        self.scheduler.delay_ms(self.latency.voices_ms).await;
        self.table.read().await.voices.clone()
    }

    pub async fn list_avatars(&self) -> Vec<Avatar> {
        self.scheduler.delay_ms(self.latency.avatars_ms).await;
        self.table.read().await.avatars.clone()
    }

    pub async fn get_voice(&self, voice_id: &str) -> Result<Voice> {
        self.scheduler.delay_ms(self.latency.status_ms).await;
        self.table
            .read()
            .await
            .voices
            .iter()
            .find(|v| v.id == voice_id)
            .cloned()
            .ok_or_else(|| LipSyncError::VoiceNotFound(voice_id.to_string()))
    }

    /// Append a pending cloned voice and schedule its outcome.
    ///
    /// The new voice is visible to `list_voices` as soon as this returns.
    pub async fn clone_voice(&self, request: VoiceCloneRequest) -> CloneHandle {
        self.scheduler.delay_ms(self.latency.clone_ms).await;

        let language_codes = request
            .target_languages
            .clone()
            .filter(|langs| !langs.is_empty())
            .unwrap_or_else(|| vec![catalog::DEFAULT_LANGUAGE.to_string()]);

        let (voice_id, epoch) = {
            let mut table = self.table.write().await;
            let voice_id = table.ids.next_id();
            table.voices.push(Voice {
                id: voice_id.clone(),
                name: request.voice_name.clone(),
                language_codes,
                kind: VoiceKind::Cloned,
                description: pending_description(&request),
                sample_url: Some(request.sample_url.clone()),
                clone_status: Some(CloneStatus::Pending),
            });
            (voice_id, table.epoch)
        };

        let step = Step {
            delay: self.policy.delay(),
            action: self.policy.outcome(),
        };
        info!(voice_id = %voice_id, settles_in = ?step.delay, "voice clone pending");
        self.spawn_outcome(voice_id.clone(), request.voice_name, epoch, step);

        CloneHandle {
            voice_id,
            status: CloneStatus::Pending,
        }
    }

    fn spawn_outcome(&self, voice_id: String, voice_name: String, epoch: u64, step: Step<CloneOutcome>) {
        let table = Arc::clone(&self.table);
        self.scheduler.run(vec![step], move |outcome| {
            let table = Arc::clone(&table);
            let voice_id = voice_id.clone();
            let voice_name = voice_name.clone();
            async move {
                let mut table = table.write().await;
                if table.epoch != epoch {
                    debug!(voice_id = %voice_id, "store was reset, dropping clone outcome");
                    return false;
                }
                if let Some(voice) = table.voices.iter_mut().find(|v| v.id == voice_id) {
                    let status = CloneStatus::from(outcome);
                    voice.description = settled_description(&voice_name, status);
                    voice.clone_status = Some(status);
                    info!(voice_id = %voice_id, %status, "voice clone settled");
                }
                false
            }
        });
    }

    /// Restore the seed catalogs and restart clone numbering.
    pub async fn reset(&self) {
        let mut table = self.table.write().await;
        let epoch = table.epoch + 1;
        *table = VoiceTable::seeded();
        table.epoch = epoch;
        debug!(epoch, "voice store reset");
    }
}
