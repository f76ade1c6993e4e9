//! Read-only queries over the engine state.

use crate::accrual;
use crate::bond::Bond;
use crate::engine::BondEngine;
use crate::error::BondError;
use crate::event::LoggedEvent;
use crate::proposal::Proposal;
use serde::Serialize;
use vow_types::{Identity, PairKey, Timestamp};

/// Everything a front end shows one identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub identity: Identity,
    pub is_bonded: bool,
    pub partner: Option<Identity>,
    pub pair_key: Option<PairKey>,
    /// Yield the active bond would pay out now, before splitting.
    #[serde(with = "vow_types::amount::raw_amount")]
    pub pending_yield: u128,
    pub has_outgoing_proposal: bool,
    #[serde(with = "vow_types::amount::raw_amount")]
    pub reward_balance: u128,
}

/// A pair of identities and whatever bond record exists for them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PairView {
    pub pair_key: PairKey,
    pub bond: Option<Bond>,
    #[serde(with = "vow_types::amount::raw_amount")]
    pub pending_yield: u128,
}

impl BondEngine {
    pub fn dashboard(&self, identity: &Identity, now: Timestamp) -> Result<DashboardView, BondError> {
        let pair_key = self.state.bonds.active_key(identity);
        let pending_yield = match pair_key {
            Some(key) => self.pending_yield(&key, now)?,
            None => 0,
        };
        let reward_balance = self.collaborators.ledger.balance_of(identity)?;
        Ok(DashboardView {
            identity: *identity,
            is_bonded: pair_key.is_some(),
            partner: self.state.bonds.partner_of(identity),
            pair_key,
            pending_yield,
            has_outgoing_proposal: self.state.proposals.has_proposal(identity),
            reward_balance,
        })
    }

    pub fn pair_view(&self, a: &Identity, b: &Identity, now: Timestamp) -> Result<PairView, BondError> {
        let pair_key = vow_crypto::pair_key(a, b);
        Ok(PairView {
            pair_key,
            bond: self.state.bonds.get(&pair_key).cloned(),
            pending_yield: self.pending_yield(&pair_key, now)?,
        })
    }

    /// Pending yield for the bond at `pair_key`; zero if there is no active bond.
    pub fn pending_yield(&self, pair_key: &PairKey, now: Timestamp) -> Result<u128, BondError> {
        match self.state.bonds.get(pair_key) {
            Some(bond) => accrual::pending_yield(bond, now, &self.params),
            None => Ok(0),
        }
    }

    /// Identities with an outstanding proposal addressed to `target`.
    pub fn incoming_proposers(&self, target: &Identity) -> &[Identity] {
        self.state.proposals.incoming(target)
    }

    /// `identity`'s own outstanding proposal.
    pub fn proposal(&self, identity: &Identity) -> Option<&Proposal> {
        self.state.proposals.get(identity)
    }

    pub fn bond(&self, pair_key: &PairKey) -> Option<&Bond> {
        self.state.bonds.get(pair_key)
    }

    /// Pair keys in bond formation order; re-bonded pairs appear once per bond.
    pub fn bond_history(&self) -> &[PairKey] {
        self.state.bonds.history()
    }

    pub fn events(&self) -> &[LoggedEvent] {
        self.state.events.records()
    }

    pub fn events_since(&self, seq: u64) -> &[LoggedEvent] {
        self.state.events.since(seq)
    }
}
