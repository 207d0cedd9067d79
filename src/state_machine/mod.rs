mod job;
mod state;

pub use job::{InputKind, Job, JobCreationRequest, JobHandle, JobStatus};
pub use state::{StateMachine, Transition, TransitionError};
