//! In-memory simulator of a lip-sync video and voice cloning backend.
//!
//! Jobs move ACCEPTED → PROCESSING → COMPLETED | FAILED on a fixed timed
//! script; cloned voices settle to AVAILABLE or CLONING_FAILED after a delay.
//! Everything is owned by a [`MockBackend`] value and lost when it is dropped.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod jobs;
pub mod poller;
pub mod scheduler;
pub mod state_machine;
pub mod voices;

pub use backend::MockBackend;
pub use catalog::{Avatar, CloneStatus, Language, Voice, VoiceKind};
pub use config::SimulatorConfig;
pub use error::{LipSyncError, Result};
pub use poller::{StatusSource, poll_until_terminal};
pub use state_machine::{InputKind, Job, JobCreationRequest, JobHandle, JobStatus};
pub use voices::{
    CloneHandle, CloneOutcome, ClonePolicy, FixedClonePolicy, RandomClonePolicy,
    VoiceCloneRequest,
};
