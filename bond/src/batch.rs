//! Unit of work over [`BondState`].
//!
//! Every engine operation opens a batch, applies its registry writes through
//! it, performs its collaborator calls, and only then calls
//! [`WriteBatch::commit`]. If the batch is dropped without committing (an
//! early `?` return after a failed mint, for example), every write is undone
//! in reverse order and staged events are discarded, leaving the state
//! exactly as it was before the batch was opened.

use crate::bond::Bond;
use crate::error::BondError;
use crate::event::BondEvent;
use crate::nullifier::ActionDomain;
use crate::proposal::{Proposal, Removal};
use crate::state::BondState;
use vow_types::{Identity, Nullifier, PairKey};

/// Journal entry: enough to reverse one write.
enum Undo {
    ProposalInserted(Identity),
    ProposalRemoved(Removal),
    BondWritten {
        key: PairKey,
        previous: Option<Bond>,
    },
    ActiveSet {
        identity: Identity,
        previous: Option<PairKey>,
    },
    HistoryPushed,
    NullifierConsumed {
        domain: ActionDomain,
        nullifier: Nullifier,
    },
}

pub(crate) struct WriteBatch<'a> {
    state: &'a mut BondState,
    undo: Vec<Undo>,
    staged: Vec<BondEvent>,
    committed: bool,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(state: &'a mut BondState) -> Self {
        Self {
            state,
            undo: Vec::new(),
            staged: Vec::new(),
            committed: false,
        }
    }

    pub(crate) fn insert_proposal(&mut self, proposal: Proposal) -> Result<(), BondError> {
        let proposer = proposal.proposer;
        self.state
            .proposals
            .insert(proposal)
            .map_err(|p| BondError::ProposalExists(p.proposer))?;
        self.undo.push(Undo::ProposalInserted(proposer));
        Ok(())
    }

    /// Remove `proposer`'s proposal if there is one, returning a copy of it.
    pub(crate) fn remove_proposal(&mut self, proposer: &Identity) -> Option<Proposal> {
        let removal = self.state.proposals.remove(proposer)?;
        let proposal = removal.proposal.clone();
        self.undo.push(Undo::ProposalRemoved(removal));
        Some(proposal)
    }

    pub(crate) fn put_bond(&mut self, key: PairKey, bond: Bond) {
        let previous = self.state.bonds.put(key, bond);
        self.undo.push(Undo::BondWritten { key, previous });
    }

    pub(crate) fn set_active(&mut self, identity: Identity, key: Option<PairKey>) {
        let previous = self.state.bonds.set_active(identity, key);
        self.undo.push(Undo::ActiveSet { identity, previous });
    }

    pub(crate) fn push_history(&mut self, key: PairKey) {
        self.state.bonds.push_history(key);
        self.undo.push(Undo::HistoryPushed);
    }

    pub(crate) fn consume_nullifier(
        &mut self,
        domain: ActionDomain,
        nullifier: Nullifier,
    ) -> Result<(), BondError> {
        if !self.state.nullifiers.consume(domain, nullifier) {
            return Err(BondError::NullifierReused(domain.name()));
        }
        self.undo.push(Undo::NullifierConsumed { domain, nullifier });
        Ok(())
    }

    /// Queue an event for the log. It is recorded only if the batch commits.
    pub(crate) fn stage(&mut self, event: BondEvent) {
        self.staged.push(event);
    }

    /// Keep every write, append staged events to the log and hand them back
    /// for fan-out.
    pub(crate) fn commit(mut self) -> Vec<BondEvent> {
        self.committed = true;
        self.undo.clear();
        let events = std::mem::take(&mut self.staged);
        for event in &events {
            self.state.events.append(event.clone());
        }
        events
    }

    fn rollback(&mut self) {
        let writes = self.undo.len();
        while let Some(entry) = self.undo.pop() {
            match entry {
                Undo::ProposalInserted(proposer) => {
                    self.state.proposals.remove(&proposer);
                }
                Undo::ProposalRemoved(removal) => self.state.proposals.restore(removal),
                Undo::BondWritten { key, previous } => self.state.bonds.restore(key, previous),
                Undo::ActiveSet { identity, previous } => {
                    self.state.bonds.set_active(identity, previous);
                }
                Undo::HistoryPushed => {
                    self.state.bonds.pop_history();
                }
                Undo::NullifierConsumed { domain, nullifier } => {
                    self.state.nullifiers.release(domain, &nullifier)
                }
            }
        }
        if writes > 0 {
            tracing::debug!(writes, discarded_events = self.staged.len(), "write batch rolled back");
        }
        self.staged.clear();
    }
}

impl Drop for WriteBatch<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vow_types::Timestamp;

    fn id(n: u64) -> Identity {
        Identity::from_low_u64(n)
    }

    fn proposal(from: u64, to: u64) -> Proposal {
        Proposal {
            proposer: id(from),
            proposed: id(to),
            proposer_nullifier: Nullifier::from_u64(from),
            accepted: false,
            created_at: Timestamp::new(5),
        }
    }

    fn bond(a: u64, b: u64) -> Bond {
        Bond {
            partner_a: id(a),
            partner_b: id(b),
            nullifier_a: Nullifier::from_u64(a),
            nullifier_b: Nullifier::from_u64(b),
            bond_start: Timestamp::new(10),
            last_claim: Timestamp::new(10),
            last_milestone: 0,
            active: true,
        }
    }

    fn seeded() -> BondState {
        let mut state = BondState::new();
        for p in 1..=3 {
            state.proposals.insert(proposal(p, 9)).unwrap();
        }
        state
    }

    #[test]
    fn commit_keeps_writes_and_logs_events() {
        let mut state = seeded();
        let key = PairKey::new([1u8; 32]);
        let mut batch = WriteBatch::new(&mut state);
        batch.remove_proposal(&id(2)).unwrap();
        batch.put_bond(key, bond(2, 9));
        batch.set_active(id(2), Some(key));
        batch.set_active(id(9), Some(key));
        batch.push_history(key);
        batch.stage(BondEvent::ProposalCancelled {
            proposer: id(2),
            proposed: id(9),
            at: Timestamp::new(20),
        });
        let events = batch.commit();

        assert_eq!(events.len(), 1);
        assert_eq!(state.events.len(), 1);
        assert_eq!(state.bonds.active_key(&id(9)), Some(key));
        assert_eq!(state.bonds.history(), &[key]);
        assert_eq!(state.proposals.incoming(&id(9)), &[id(1), id(3)]);
        assert!(state.is_consistent());
    }

    #[test]
    fn drop_without_commit_restores_everything() {
        let mut state = seeded();
        let key = PairKey::new([2u8; 32]);
        let old = bond(7, 8);
        state.bonds.put(key, old.clone());
        let before_incoming = state.proposals.incoming(&id(9)).to_vec();

        {
            let mut batch = WriteBatch::new(&mut state);
            batch.remove_proposal(&id(1)).unwrap();
            batch.remove_proposal(&id(3)).unwrap();
            batch.insert_proposal(proposal(4, 9)).unwrap();
            batch.put_bond(key, bond(1, 3));
            batch.set_active(id(1), Some(key));
            batch.push_history(key);
            batch.consume_nullifier(ActionDomain::Accept, Nullifier::from_u64(42)).unwrap();
            batch.stage(BondEvent::NullifierConsumed {
                domain: ActionDomain::Accept,
                nullifier: Nullifier::from_u64(42),
            });
        }

        assert_eq!(state.proposals.incoming(&id(9)), before_incoming.as_slice());
        assert!(!state.proposals.has_proposal(&id(4)));
        assert_eq!(state.bonds.get(&key), Some(&old));
        assert!(!state.bonds.is_bonded(&id(1)));
        assert!(state.bonds.history().is_empty());
        assert!(!state
            .nullifiers
            .is_consumed(ActionDomain::Accept, &Nullifier::from_u64(42)));
        assert!(state.events.is_empty());
        assert!(state.is_consistent());
    }

    #[test]
    fn reused_nullifier_is_rejected_without_journal_entry() {
        let mut state = BondState::new();
        let n = Nullifier::from_u64(3);
        state.nullifiers.consume(ActionDomain::Propose, n);
        let mut batch = WriteBatch::new(&mut state);
        let err = batch.consume_nullifier(ActionDomain::Propose, n).unwrap_err();
        assert!(matches!(err, BondError::NullifierReused("propose")));
        drop(batch);
        assert!(state.nullifiers.is_consumed(ActionDomain::Propose, &n));
    }

    #[test]
    fn duplicate_insert_reports_proposal_exists() {
        let mut state = seeded();
        let mut batch = WriteBatch::new(&mut state);
        let err = batch.insert_proposal(proposal(1, 5)).unwrap_err();
        assert!(matches!(err, BondError::ProposalExists(p) if p == id(1)));
    }
}
