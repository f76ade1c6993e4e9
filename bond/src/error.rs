//! Bond engine errors.

use thiserror::Error;
use vow_collaborators::CollaboratorError;
use vow_types::Identity;

#[derive(Debug, Error)]
pub enum BondError {
    #[error("cannot propose to the null identity")]
    InvalidTarget,

    #[error("cannot propose to yourself")]
    SelfTarget,

    #[error("{0} already has an outstanding proposal")]
    ProposalExists(Identity),

    #[error("{0} is already in an active bond")]
    AlreadyBonded(Identity),

    #[error("{proposer} has no outstanding proposal to {caller}")]
    NotProposedToYou { proposer: Identity, caller: Identity },

    #[error("{0} has no outstanding proposal")]
    NoProposal(Identity),

    #[error("no active bond between these identities")]
    NoActiveBond,

    #[error("{0} is not a participant in this bond")]
    NotYourBond(Identity),

    #[error("nothing to claim")]
    NothingToClaim,

    #[error("nullifier already used for the {0} action")]
    NullifierReused(&'static str),

    #[error("identity proof rejected: {0}")]
    VerificationFailed(String),

    #[error("unauthorized caller {0}")]
    Unauthorized(Identity),

    #[error("no milestone schedule defined for period {0}")]
    ScheduleNotFound(u32),

    #[error("milestone schedule is frozen")]
    ScheduleFrozen,

    #[error("arithmetic overflow in bond computation")]
    Overflow,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("collaborator error: {0}")]
    Collaborator(String),
}

impl From<CollaboratorError> for BondError {
    fn from(e: CollaboratorError) -> Self {
        match e {
            CollaboratorError::VerificationFailed(reason) => Self::VerificationFailed(reason),
            CollaboratorError::Unauthorized(who) => Self::Unauthorized(who),
            CollaboratorError::ScheduleNotFound(period) => Self::ScheduleNotFound(period),
            CollaboratorError::Frozen => Self::ScheduleFrozen,
            CollaboratorError::Backend(msg) => Self::Collaborator(msg),
        }
    }
}
