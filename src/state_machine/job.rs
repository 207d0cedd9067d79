use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LipSyncError, Result};

/// Lifecycle status of a lip-sync job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Accepted,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// COMPLETED and FAILED admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "PENDING"),
            JobStatus::Accepted => write!(f, "ACCEPTED"),
            JobStatus::Processing => write!(f, "PROCESSING"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Where the spoken content of a job comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputKind {
    Audio,
    Text,
}

/// What the caller wants rendered. Echoed back verbatim on every job snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobCreationRequest {
    /// URL, or a placeholder such as the filename of an uploaded video.
    pub video_input_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_input_url: Option<String>,
    /// Script for text-to-speech, used when no audio is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_input: Option<String>,
    /// ISO 639-1 code.
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_viseme_mapping_id: Option<String>,
    /// 0.0 - 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_intensity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaking_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl JobCreationRequest {
    pub fn new(video_input_url: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            video_input_url: video_input_url.into(),
            target_language: target_language.into(),
            ..Default::default()
        }
    }

    pub fn with_audio(mut self, audio_input_url: impl Into<String>) -> Self {
        self.audio_input_url = Some(audio_input_url.into());
        self
    }

    pub fn with_text(mut self, text_input: impl Into<String>) -> Self {
        self.text_input = Some(text_input.into());
        self
    }

    /// Audio wins when both an audio source and a script are present.
    pub fn input_kind(&self) -> InputKind {
        if self.audio_input_url.is_some() {
            InputKind::Audio
        } else {
            InputKind::Text
        }
    }

    /// Form-level checks. The store never calls this; submitting callers do.
    pub fn validate(&self) -> Result<()> {
        if self.video_input_url.trim().is_empty() {
            return Err(LipSyncError::Validation("a video input is required".into()));
        }
        let has_audio = self
            .audio_input_url
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        let has_text = self
            .text_input
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if !has_audio && !has_text {
            return Err(LipSyncError::Validation(
                "either an audio input or a text script is required".into(),
            ));
        }
        if self.target_language.trim().is_empty() {
            return Err(LipSyncError::Validation("a target language is required".into()));
        }
        if let Some(intensity) = self.emotion_intensity
            && !(0.0..=1.0).contains(&intensity)
        {
            return Err(LipSyncError::Validation(format!(
                "emotion intensity must be between 0.0 and 1.0, got {intensity}"
            )));
        }
        Ok(())
    }
}

/// Returned as soon as a job is accepted, before any processing happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    #[serde(rename = "job_id")]
    pub id: String,
    pub status: JobStatus,
}

/// Snapshot of a single lip-sync job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "job_id")]
    pub id: String,
    pub status: JobStatus,
    #[serde(rename = "input_payload_echo")]
    pub input: JobCreationRequest,
    /// 0-100, never decreases.
    pub progress: u8,
    #[serde(
        rename = "output_video_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub output_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Distinct statuses this job has passed through, oldest first.
    pub status_history: Vec<JobStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// A freshly submitted job: ACCEPTED with no progress.
    pub fn accepted(id: String, input: JobCreationRequest) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Accepted,
            input,
            progress: 0,
            output_url: None,
            processing_time_seconds: None,
            error_message: None,
            status_history: vec![JobStatus::Accepted],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn handle(&self) -> JobHandle {
        JobHandle {
            id: self.id.clone(),
            status: self.status,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
