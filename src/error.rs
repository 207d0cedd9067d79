use thiserror::Error;

#[derive(Debug, Error)]
pub enum LipSyncError {
    #[error("Job with ID {0} not found.")]
    JobNotFound(String),

    #[error("Voice with ID {0} not found.")]
    VoiceNotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LipSyncError>;
