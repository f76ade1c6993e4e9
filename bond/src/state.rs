//! The explicit state container every engine operation runs against.

use crate::bond::BondRegistry;
use crate::error::BondError;
use crate::event::EventLog;
use crate::nullifier::NullifierGuard;
use crate::proposal::ProposalRegistry;
use serde::{Deserialize, Serialize};

/// All registries owned by one bond engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BondState {
    pub proposals: ProposalRegistry,
    pub bonds: BondRegistry,
    pub nullifiers: NullifierGuard,
    pub events: EventLog,
}

impl BondState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both index invariants hold, and no bonded identity still has a live proposal.
    pub fn is_consistent(&self) -> bool {
        self.proposals.is_consistent()
            && self.bonds.is_consistent()
            && self
                .proposals
                .iter()
                .all(|p| !self.bonds.is_bonded(&p.proposer))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, BondError> {
        bincode::serialize(self).map_err(|e| BondError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BondError> {
        bincode::deserialize(bytes).map_err(|e| BondError::Snapshot(e.to_string()))
    }
}
