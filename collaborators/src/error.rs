use thiserror::Error;
use vow_types::Identity;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("proof verification failed: {0}")]
    VerificationFailed(String),

    #[error("caller {0} is not authorized for this operation")]
    Unauthorized(Identity),

    #[error("no milestone schedule defined for period {0}")]
    ScheduleNotFound(u32),

    #[error("milestone schedule is frozen")]
    Frozen,

    #[error("collaborator backend error: {0}")]
    Backend(String),
}
