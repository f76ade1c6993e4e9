//! The bond lifecycle engine.
//!
//! `BondEngine` owns the [`BondState`] and drives every state transition:
//! propose, accept, cancel, claim, divorce and anniversary catch-up. Each
//! operation validates against the current state, verifies proofs, stages
//! its writes in a [`WriteBatch`], calls out to the reward ledger and the
//! certificate issuers, and commits only if every call succeeded.
//!
//! Collaborators are reached through shared `&self` trait objects while the
//! engine itself needs `&mut self`, so no collaborator can call back into
//! the engine in the middle of an operation.

use crate::accrual::{pending_yield, split_evenly};
use crate::batch::WriteBatch;
use crate::bond::Bond;
use crate::error::BondError;
use crate::event::{BondEvent, EventBus};
use crate::milestone::plan_catch_up;
use crate::nullifier::ActionDomain;
use crate::proposal::Proposal;
use crate::state::BondState;
use serde::Serialize;
use std::sync::Arc;
use vow_collaborators::{
    CertificateId, CertificateIssuer, CertificateMetadata, IdentityVerifier, MilestoneIssuer,
    RewardLedger, SnapshotStore, VerificationRequest,
};
use vow_types::{BondParams, FieldElement, Identity, PairKey, ProofBundle, Timestamp};

/// The external services the engine mints and verifies through.
#[derive(Clone)]
pub struct Collaborators {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub bond_issuer: Arc<dyn CertificateIssuer>,
    pub milestone_issuer: Arc<dyn MilestoneIssuer>,
    pub ledger: Arc<dyn RewardLedger>,
}

/// Outcome of a successful `accept`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Acceptance {
    pub pair_key: PairKey,
    /// The proposal that was accepted, with `accepted` set.
    pub proposal: Proposal,
    /// Bond certificates minted to the proposer and the acceptor, in that order.
    pub certificates: [CertificateId; 2],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YieldReceipt {
    pub pair_key: PairKey,
    #[serde(with = "vow_types::amount::raw_amount")]
    pub total: u128,
    #[serde(with = "vow_types::amount::raw_amount")]
    pub per_partner: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub pair_key: PairKey,
    /// Yield pending at dissolution, before splitting.
    #[serde(with = "vow_types::amount::raw_amount")]
    pub settled: u128,
    #[serde(with = "vow_types::amount::raw_amount")]
    pub per_partner: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatchUpReceipt {
    pub pair_key: PairKey,
    pub first_period: u32,
    pub last_period: u32,
    /// True when the issuer's schedule stopped the catch-up short of the
    /// elapsed period count.
    pub capped: bool,
    /// Two certificates per period, partner_a's first.
    pub certificates: Vec<CertificateId>,
}

pub struct BondEngine {
    pub(crate) params: BondParams,
    pub(crate) minter: Identity,
    propose_action: FieldElement,
    accept_action: FieldElement,
    pub(crate) collaborators: Collaborators,
    pub(crate) state: BondState,
    bus: EventBus,
}

impl BondEngine {
    /// Create an engine with empty state.
    ///
    /// `minter` is the identity the engine presents to the reward ledger and
    /// certificate issuers; it must be authorised with each of them.
    pub fn new(
        params: BondParams,
        minter: Identity,
        collaborators: Collaborators,
    ) -> Result<Self, BondError> {
        Self::with_state(params, minter, collaborators, BondState::new())
    }

    pub fn with_state(
        params: BondParams,
        minter: Identity,
        collaborators: Collaborators,
        state: BondState,
    ) -> Result<Self, BondError> {
        params
            .validate()
            .map_err(|e| BondError::Config(e.to_string()))?;
        if minter.is_zero() {
            return Err(BondError::Config("minter identity must not be null".into()));
        }
        let propose_action = vow_crypto::action_id(&params.app_id, ActionDomain::Propose.name());
        let accept_action = vow_crypto::action_id(&params.app_id, ActionDomain::Accept.name());
        tracing::debug!(app_id = %params.app_id, %propose_action, %accept_action, "action domains derived");
        Ok(Self {
            params,
            minter,
            propose_action,
            accept_action,
            collaborators,
            state,
            bus: EventBus::new(),
        })
    }

    pub fn params(&self) -> &BondParams {
        &self.params
    }

    pub fn state(&self) -> &BondState {
        &self.state
    }

    /// The action id proofs for `domain` must be generated against.
    pub fn action_id(&self, domain: ActionDomain) -> FieldElement {
        match domain {
            ActionDomain::Propose => self.propose_action,
            ActionDomain::Accept => self.accept_action,
        }
    }

    /// Register a listener for committed events.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&BondEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    // ── Proposals ──────────────────────────────────────────────────────

    /// Offer a bond from `proposer` to `proposed`.
    pub fn propose(
        &mut self,
        proposer: Identity,
        proposed: Identity,
        bundle: &ProofBundle,
        now: Timestamp,
    ) -> Result<(), BondError> {
        let result = self.try_propose(proposer, proposed, bundle, now);
        if let Err(e) = &result {
            tracing::warn!(%proposer, %proposed, error = %e, "propose rejected");
        }
        result
    }

    fn try_propose(
        &mut self,
        proposer: Identity,
        proposed: Identity,
        bundle: &ProofBundle,
        now: Timestamp,
    ) -> Result<(), BondError> {
        if proposed.is_zero() {
            return Err(BondError::InvalidTarget);
        }
        if proposed == proposer {
            return Err(BondError::SelfTarget);
        }
        if self.state.proposals.has_proposal(&proposer) {
            return Err(BondError::ProposalExists(proposer));
        }
        self.ensure_unbonded(&[proposer, proposed])?;
        self.ensure_fresh(ActionDomain::Propose, bundle)?;
        self.verify(ActionDomain::Propose, &proposer, bundle)?;

        let mut batch = WriteBatch::new(&mut self.state);
        if self.params.replay_guard {
            batch.consume_nullifier(ActionDomain::Propose, bundle.nullifier)?;
            batch.stage(BondEvent::NullifierConsumed {
                domain: ActionDomain::Propose,
                nullifier: bundle.nullifier,
            });
        }
        batch.insert_proposal(Proposal {
            proposer,
            proposed,
            proposer_nullifier: bundle.nullifier,
            accepted: false,
            created_at: now,
        })?;
        batch.stage(BondEvent::ProposalCreated {
            proposer,
            proposed,
            at: now,
        });
        let events = batch.commit();
        self.publish(&events);

        tracing::info!(%proposer, %proposed, "proposal created");
        Ok(())
    }

    /// Accept the outstanding proposal `proposer` addressed to `caller`,
    /// forming a bond between them.
    pub fn accept(
        &mut self,
        caller: Identity,
        proposer: Identity,
        bundle: &ProofBundle,
        now: Timestamp,
    ) -> Result<Acceptance, BondError> {
        let result = self.try_accept(caller, proposer, bundle, now);
        if let Err(e) = &result {
            tracing::warn!(%caller, %proposer, error = %e, "accept rejected");
        }
        result
    }

    fn try_accept(
        &mut self,
        caller: Identity,
        proposer: Identity,
        bundle: &ProofBundle,
        now: Timestamp,
    ) -> Result<Acceptance, BondError> {
        let proposer_nullifier = self
            .state
            .proposals
            .get(&proposer)
            .filter(|p| p.proposed == caller)
            .map(|p| p.proposer_nullifier)
            .ok_or(BondError::NotProposedToYou { proposer, caller })?;
        self.ensure_unbonded(&[caller, proposer])?;
        self.ensure_fresh(ActionDomain::Accept, bundle)?;
        self.verify(ActionDomain::Accept, &caller, bundle)?;

        let pair_key = vow_crypto::pair_key(&proposer, &caller);
        if self.state.bonds.get_active(&pair_key).is_some() {
            return Err(BondError::AlreadyBonded(caller));
        }

        let mut batch = WriteBatch::new(&mut self.state);
        if self.params.replay_guard {
            batch.consume_nullifier(ActionDomain::Accept, bundle.nullifier)?;
            batch.stage(BondEvent::NullifierConsumed {
                domain: ActionDomain::Accept,
                nullifier: bundle.nullifier,
            });
        }
        let mut proposal = batch
            .remove_proposal(&proposer)
            .ok_or(BondError::NotProposedToYou { proposer, caller })?;
        proposal.accepted = true;
        if let Some(own) = batch.remove_proposal(&caller) {
            tracing::debug!(%caller, withdrawn_target = %own.proposed, "acceptor's own proposal withdrawn");
            batch.stage(BondEvent::ProposalCancelled {
                proposer: caller,
                proposed: own.proposed,
                at: now,
            });
        }
        batch.put_bond(
            pair_key,
            Bond {
                partner_a: proposer,
                partner_b: caller,
                nullifier_a: proposer_nullifier,
                nullifier_b: bundle.nullifier,
                bond_start: now,
                last_claim: now,
                last_milestone: 0,
                active: true,
            },
        );
        batch.set_active(proposer, Some(pair_key));
        batch.set_active(caller, Some(pair_key));
        batch.push_history(pair_key);
        batch.stage(BondEvent::ProposalAccepted {
            proposer,
            acceptor: caller,
            pair_key,
            at: now,
        });

        let issuer = &self.collaborators.bond_issuer;
        let to_proposer = issuer.mint_certificate(
            &self.minter,
            &proposer,
            &CertificateMetadata::Bond {
                pair_key,
                partner: caller,
                bond_start: now,
            },
        )?;
        let to_acceptor = issuer.mint_certificate(
            &self.minter,
            &caller,
            &CertificateMetadata::Bond {
                pair_key,
                partner: proposer,
                bond_start: now,
            },
        )?;
        if self.params.initial_reward > 0 {
            for who in [proposer, caller] {
                self.collaborators
                    .ledger
                    .mint(&self.minter, &who, self.params.initial_reward)?;
            }
        }
        let events = batch.commit();
        self.publish(&events);

        tracing::info!(%proposer, acceptor = %caller, %pair_key, "bond formed");
        Ok(Acceptance {
            pair_key,
            proposal,
            certificates: [to_proposer, to_acceptor],
        })
    }

    /// Withdraw `caller`'s outstanding proposal.
    pub fn cancel_proposal(&mut self, caller: Identity, now: Timestamp) -> Result<(), BondError> {
        let mut batch = WriteBatch::new(&mut self.state);
        let Some(removed) = batch.remove_proposal(&caller) else {
            tracing::warn!(%caller, "cancel rejected: no outstanding proposal");
            return Err(BondError::NoProposal(caller));
        };
        batch.stage(BondEvent::ProposalCancelled {
            proposer: caller,
            proposed: removed.proposed,
            at: now,
        });
        let events = batch.commit();
        self.publish(&events);

        tracing::info!(proposer = %caller, proposed = %removed.proposed, "proposal cancelled");
        Ok(())
    }

    // ── Bonds ──────────────────────────────────────────────────────────

    /// Mint the yield accrued since the last claim, split evenly between
    /// both partners. Either partner may call.
    pub fn claim_yield(
        &mut self,
        caller: Identity,
        partner: Identity,
        now: Timestamp,
    ) -> Result<YieldReceipt, BondError> {
        let result = self.try_claim_yield(caller, partner, now);
        if let Err(e) = &result {
            tracing::warn!(%caller, %partner, error = %e, "claim rejected");
        }
        result
    }

    fn try_claim_yield(
        &mut self,
        caller: Identity,
        partner: Identity,
        now: Timestamp,
    ) -> Result<YieldReceipt, BondError> {
        let (pair_key, bond) = self.active_bond(&caller, &partner)?;
        let total = pending_yield(&bond, now, &self.params)?;
        if total == 0 {
            return Err(BondError::NothingToClaim);
        }
        let per_partner = split_evenly(total);
        if per_partner == 0 {
            return Err(BondError::NothingToClaim);
        }

        let partners = bond.partners();
        let mut batch = WriteBatch::new(&mut self.state);
        batch.put_bond(
            pair_key,
            Bond {
                last_claim: now,
                ..bond
            },
        );
        batch.stage(BondEvent::YieldClaimed {
            pair_key,
            claimed_by: caller,
            total,
            per_partner,
            at: now,
        });
        for who in partners {
            self.collaborators.ledger.mint(&self.minter, &who, per_partner)?;
        }
        let events = batch.commit();
        self.publish(&events);

        tracing::info!(%pair_key, claimed_by = %caller, total, per_partner, "yield claimed");
        Ok(YieldReceipt {
            pair_key,
            total,
            per_partner,
        })
    }

    /// Dissolve the bond between `caller` and `partner`, settling any
    /// pending yield first. Both identities are free to bond again afterwards.
    pub fn divorce(
        &mut self,
        caller: Identity,
        partner: Identity,
        now: Timestamp,
    ) -> Result<Settlement, BondError> {
        let result = self.try_divorce(caller, partner, now);
        if let Err(e) = &result {
            tracing::warn!(%caller, %partner, error = %e, "divorce rejected");
        }
        result
    }

    fn try_divorce(
        &mut self,
        caller: Identity,
        partner: Identity,
        now: Timestamp,
    ) -> Result<Settlement, BondError> {
        let (pair_key, bond) = self.active_bond(&caller, &partner)?;
        let settled = pending_yield(&bond, now, &self.params)?;
        let per_partner = split_evenly(settled);

        let partners = bond.partners();
        let mut batch = WriteBatch::new(&mut self.state);
        batch.put_bond(
            pair_key,
            Bond {
                active: false,
                last_claim: now,
                ..bond
            },
        );
        for who in partners {
            batch.set_active(who, None);
        }
        batch.stage(BondEvent::BondDissolved {
            pair_key,
            dissolved_by: caller,
            settled,
            at: now,
        });
        if per_partner > 0 {
            for who in partners {
                self.collaborators.ledger.mint(&self.minter, &who, per_partner)?;
            }
        }
        let events = batch.commit();
        self.publish(&events);

        tracing::info!(%pair_key, dissolved_by = %caller, settled, "bond dissolved");
        Ok(Settlement {
            pair_key,
            settled,
            per_partner,
        })
    }

    /// Issue every outstanding anniversary certificate for the bond, up to
    /// the milestone issuer's schedule ceiling.
    pub fn manual_check_and_mint(
        &mut self,
        caller: Identity,
        partner: Identity,
        now: Timestamp,
    ) -> Result<CatchUpReceipt, BondError> {
        let result = self.try_check_and_mint(caller, partner, now);
        if let Err(e) = &result {
            tracing::warn!(%caller, %partner, error = %e, "anniversary check rejected");
        }
        result
    }

    fn try_check_and_mint(
        &mut self,
        caller: Identity,
        partner: Identity,
        now: Timestamp,
    ) -> Result<CatchUpReceipt, BondError> {
        let (pair_key, bond) = self.active_bond(&caller, &partner)?;
        let schedule_ceiling = self.collaborators.milestone_issuer.schedule_ceiling();
        let plan = plan_catch_up(
            &bond,
            now,
            self.params.milestone_period_secs,
            schedule_ceiling,
        )?;

        let [a, b] = bond.partners();
        let mut batch = WriteBatch::new(&mut self.state);
        batch.put_bond(
            pair_key,
            Bond {
                last_milestone: plan.ceiling,
                ..bond
            },
        );
        let mut certificates = Vec::with_capacity(2 * plan.periods().count());
        for period in plan.periods() {
            for (owner, other) in [(a, b), (b, a)] {
                let id = self.collaborators.milestone_issuer.mint_certificate(
                    &self.minter,
                    &owner,
                    &CertificateMetadata::Anniversary {
                        pair_key,
                        partner: other,
                        period,
                    },
                )?;
                certificates.push(id);
            }
            batch.stage(BondEvent::AnniversaryAchieved {
                pair_key,
                period,
                at: now,
            });
        }
        let events = batch.commit();
        self.publish(&events);

        if plan.is_capped() {
            tracing::info!(
                %pair_key,
                periods_elapsed = plan.periods_elapsed,
                schedule_ceiling,
                "anniversary catch-up capped by schedule"
            );
        }
        tracing::info!(%pair_key, first = plan.start, last = plan.ceiling, "anniversaries issued");
        Ok(CatchUpReceipt {
            pair_key,
            first_period: plan.start,
            last_period: plan.ceiling,
            capped: plan.is_capped(),
            certificates,
        })
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Write the full engine state to `store` as a single bincode snapshot.
    pub fn save_to_store(&self, store: &dyn SnapshotStore) -> Result<(), BondError> {
        let bytes = self.state.to_bytes()?;
        store
            .put_snapshot(&bytes)
            .map_err(|e| BondError::Snapshot(e.to_string()))?;
        tracing::debug!(bytes = bytes.len(), events = self.state.events.len(), "snapshot saved");
        Ok(())
    }

    /// Replace the engine state with the snapshot in `store`.
    ///
    /// Returns `false` and leaves the state untouched if the store is empty.
    pub fn load_from_store(&mut self, store: &dyn SnapshotStore) -> Result<bool, BondError> {
        let Some(bytes) = store
            .get_snapshot()
            .map_err(|e| BondError::Snapshot(e.to_string()))?
        else {
            return Ok(false);
        };
        let state = BondState::from_bytes(&bytes)?;
        if !state.is_consistent() {
            return Err(BondError::Snapshot("snapshot indices are inconsistent".into()));
        }
        tracing::info!(
            proposals = state.proposals.len(),
            bonds = state.bonds.len(),
            events = state.events.len(),
            "snapshot loaded"
        );
        self.state = state;
        Ok(true)
    }

    // ── Helpers ────────────────────────────────────────────────────────

    fn ensure_unbonded(&self, who: &[Identity]) -> Result<(), BondError> {
        match who.iter().find(|id| self.state.bonds.is_bonded(id)) {
            Some(id) => Err(BondError::AlreadyBonded(*id)),
            None => Ok(()),
        }
    }

    /// Replay check, done before the verifier is consulted.
    fn ensure_fresh(&self, domain: ActionDomain, bundle: &ProofBundle) -> Result<(), BondError> {
        if self.params.replay_guard && self.state.nullifiers.is_consumed(domain, &bundle.nullifier)
        {
            return Err(BondError::NullifierReused(domain.name()));
        }
        Ok(())
    }

    fn verify(
        &self,
        domain: ActionDomain,
        caller: &Identity,
        bundle: &ProofBundle,
    ) -> Result<(), BondError> {
        let request = VerificationRequest {
            root: bundle.root,
            action_id: self.action_id(domain),
            signal: vow_crypto::signal_for(caller),
            nullifier: bundle.nullifier,
            proof: &bundle.proof,
        };
        self.collaborators.verifier.verify(&request)?;
        Ok(())
    }

    /// The active bond between `caller` and `partner`, with `caller` checked
    /// as a participant.
    ///
    /// The key is derived from `caller`, so `NotYourBond` only fires when the
    /// stored record disagrees with its key, as in a stale or corrupted snapshot.
    fn active_bond(&self, caller: &Identity, partner: &Identity) -> Result<(PairKey, Bond), BondError> {
        let pair_key = vow_crypto::pair_key(caller, partner);
        let bond = self
            .state
            .bonds
            .get_active(&pair_key)
            .ok_or(BondError::NoActiveBond)?;
        if !bond.is_participant(caller) {
            return Err(BondError::NotYourBond(*caller));
        }
        Ok((pair_key, bond.clone()))
    }

    fn publish(&self, events: &[BondEvent]) {
        for event in events {
            self.bus.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vow_nullables::{NullCertificateIssuer, NullMilestoneIssuer, NullRewardLedger, NullVerifier};
    use vow_types::Nullifier;

    fn id(n: u64) -> Identity {
        Identity::from_low_u64(n)
    }

    fn engine_with(state: BondState) -> BondEngine {
        let minter = id(0xc0de);
        BondEngine::with_state(
            BondParams::default(),
            minter,
            Collaborators {
                verifier: Arc::new(NullVerifier::accepting()),
                bond_issuer: Arc::new(NullCertificateIssuer::new(minter)),
                milestone_issuer: Arc::new(NullMilestoneIssuer::new(minter, 4)),
                ledger: Arc::new(NullRewardLedger::new(minter)),
            },
            state,
        )
        .unwrap()
    }

    #[test]
    fn record_under_wrong_key_is_not_yours() {
        // A record for (3, 4) stored under the key of (1, 2).
        let key = vow_crypto::pair_key(&id(1), &id(2));
        let mut state = BondState::new();
        state.bonds.put(
            key,
            Bond {
                partner_a: id(3),
                partner_b: id(4),
                nullifier_a: Nullifier::from_u64(3),
                nullifier_b: Nullifier::from_u64(4),
                bond_start: Timestamp::new(0),
                last_claim: Timestamp::new(0),
                last_milestone: 0,
                active: true,
            },
        );
        let mut engine = engine_with(state);
        let later = Timestamp::new(10 * BondParams::default().accrual_period_secs);

        assert!(matches!(
            engine.claim_yield(id(1), id(2), later),
            Err(BondError::NotYourBond(who)) if who == id(1)
        ));
        assert!(matches!(
            engine.divorce(id(2), id(1), later),
            Err(BondError::NotYourBond(who)) if who == id(2)
        ));
        assert!(matches!(
            engine.manual_check_and_mint(id(1), id(2), later),
            Err(BondError::NotYourBond(_))
        ));
        assert!(engine.bond(&key).unwrap().active);
        assert!(engine.events().is_empty());
    }
}
