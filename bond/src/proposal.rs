//! Proposals and the incoming-proposal index.
//!
//! Each proposer has at most one live proposal. For every target the
//! registry keeps the list of proposers currently addressing it plus a
//! reverse map proposer → slot, so any entry can be removed in O(1) by
//! swapping the last entry into its slot and truncating.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vow_types::{Identity, Nullifier, Timestamp};

/// An outstanding offer from `proposer` to bond with `proposed`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposer: Identity,
    pub proposed: Identity,
    /// Nullifier of the proof the proposer submitted with the proposal.
    pub proposer_nullifier: Nullifier,
    /// Set only on the copy reported when the proposal is accepted.
    pub accepted: bool,
    pub created_at: Timestamp,
}

/// A proposal taken out of the registry, with the incoming-index slot it held.
///
/// Passing it back to [`ProposalRegistry::restore`] undoes the removal
/// exactly, provided later mutations have been undone first.
#[derive(Clone, Debug)]
pub struct Removal {
    pub proposal: Proposal,
    slot: Option<usize>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProposalRegistry {
    proposals: HashMap<Identity, Proposal>,
    /// target → proposers currently addressing it.
    incoming: HashMap<Identity, Vec<Identity>>,
    /// proposer → slot in `incoming[proposal.proposed]`.
    positions: HashMap<Identity, usize>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, proposer: &Identity) -> Option<&Proposal> {
        self.proposals.get(proposer)
    }

    pub fn has_proposal(&self, proposer: &Identity) -> bool {
        self.proposals.contains_key(proposer)
    }

    /// Proposers currently addressing `target`, in index order.
    pub fn incoming(&self, target: &Identity) -> &[Identity] {
        self.incoming.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Slot of `proposer` in its target's incoming list.
    pub fn position_of(&self, proposer: &Identity) -> Option<usize> {
        self.positions.get(proposer).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Register a proposal and append its proposer to the target's incoming list.
    ///
    /// Returns the proposal back if the proposer already has one.
    pub(crate) fn insert(&mut self, proposal: Proposal) -> Result<(), Proposal> {
        if self.proposals.contains_key(&proposal.proposer) {
            return Err(proposal);
        }
        let list = self.incoming.entry(proposal.proposed).or_default();
        list.push(proposal.proposer);
        self.positions.insert(proposal.proposer, list.len() - 1);
        tracing::debug!(
            proposer = %proposal.proposer,
            target = %proposal.proposed,
            slot = list.len() - 1,
            "incoming index append"
        );
        self.proposals.insert(proposal.proposer, proposal);
        Ok(())
    }

    /// Delete `proposer`'s proposal and swap-remove it from the incoming index.
    pub(crate) fn remove(&mut self, proposer: &Identity) -> Option<Removal> {
        let proposal = self.proposals.remove(proposer)?;
        let slot = self.detach(&proposal.proposed, proposer);
        Some(Removal { proposal, slot })
    }

    /// O(1) removal: move the last entry into the vacated slot, then truncate.
    fn detach(&mut self, target: &Identity, proposer: &Identity) -> Option<usize> {
        let slot = self.positions.remove(proposer)?;
        let list = self.incoming.get_mut(target)?;
        let last = list.len().checked_sub(1)?;
        if slot != last {
            let moved = list[last];
            list[slot] = moved;
            self.positions.insert(moved, slot);
        }
        list.pop();
        if list.is_empty() {
            self.incoming.remove(target);
        }
        tracing::debug!(%proposer, %target, slot, "incoming index swap-remove");
        Some(slot)
    }

    /// Undo a [`remove`](Self::remove), restoring the exact index layout.
    pub(crate) fn restore(&mut self, removal: Removal) {
        let Removal { proposal, slot } = removal;
        let proposer = proposal.proposer;
        if let Some(slot) = slot {
            let list = self.incoming.entry(proposal.proposed).or_default();
            if slot >= list.len() {
                list.push(proposer);
            } else {
                let displaced = list[slot];
                list.push(displaced);
                self.positions.insert(displaced, list.len() - 1);
                list[slot] = proposer;
            }
            self.positions.insert(proposer, slot);
        }
        self.proposals.insert(proposer, proposal);
    }

    /// Check that every proposal sits in its target's list at its recorded slot
    /// and that no list holds a stale entry.
    pub fn is_consistent(&self) -> bool {
        let indexed: usize = self.incoming.values().map(Vec::len).sum();
        if indexed != self.proposals.len() || self.positions.len() != self.proposals.len() {
            return false;
        }
        self.proposals.values().all(|p| {
            self.positions
                .get(&p.proposer)
                .and_then(|&slot| self.incoming.get(&p.proposed)?.get(slot))
                .is_some_and(|at| *at == p.proposer)
        })
    }
}
