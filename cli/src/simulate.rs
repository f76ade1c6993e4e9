//! Scripted lifecycle run against the nullable collaborators.
//!
//! Two fixed identities propose, accept, claim accrued yield, catch up on
//! anniversaries and finally divorce. Each step's outcome (or error) is
//! reported, together with both dashboards and the full event log.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use vow_bond::{BondEngine, BondError, Collaborators, EngineConfig};
use vow_nullables::{
    NullCertificateIssuer, NullClock, NullMilestoneIssuer, NullRewardLedger, NullVerifier,
};
use vow_types::{format_reward, FieldElement, Identity, Nullifier, Proof, ProofBundle};
use vow_utils::format_duration;

const GENESIS: u64 = 1_700_000_000;

pub struct Script {
    pub accrual_periods: u64,
    pub milestone_periods: u64,
    pub schedule_ceiling: u32,
}

fn outcome<T: Serialize>(result: Result<T, BondError>) -> anyhow::Result<Value> {
    Ok(match result {
        Ok(value) => json!({ "ok": serde_json::to_value(value)? }),
        Err(e) => json!({ "error": e.to_string() }),
    })
}

fn proof(n: u64) -> ProofBundle {
    ProofBundle::new(FieldElement::from_u64(n), Nullifier::from_u64(n), Proof::default())
}

fn dashboards(engine: &BondEngine, who: &[Identity], clock: &NullClock) -> anyhow::Result<Value> {
    let mut views = Vec::with_capacity(who.len());
    for id in who {
        let view = engine.dashboard(id, clock.now())?;
        let mut value = serde_json::to_value(&view)?;
        value["reward_balance_display"] = json!(format_reward(view.reward_balance));
        views.push(value);
    }
    Ok(Value::Array(views))
}

pub fn run(config: &EngineConfig, script: &Script) -> anyhow::Result<Value> {
    let clock = NullClock::new(GENESIS);
    let bond_issuer = Arc::new(NullCertificateIssuer::new(config.minter));
    let milestones = Arc::new(NullMilestoneIssuer::new(config.minter, script.schedule_ceiling));
    let mut engine = config.build_engine(Collaborators {
        verifier: Arc::new(NullVerifier::accepting()),
        bond_issuer: bond_issuer.clone(),
        milestone_issuer: milestones.clone(),
        ledger: Arc::new(NullRewardLedger::new(config.minter)),
    })?;
    let params = engine.params().clone();

    let alice = Identity::from_low_u64(0xa11ce);
    let bob = Identity::from_low_u64(0xb0b);

    let proposed = outcome(engine.propose(alice, bob, &proof(1), clock.now()))?;
    let accepted = outcome(engine.accept(bob, alice, &proof(2), clock.now()))?;
    let bond_start = clock.now();

    clock.advance_periods(script.accrual_periods, params.accrual_period_secs);
    let claimed = outcome(engine.claim_yield(alice, bob, clock.now()))?;

    let anniversary_at = bond_start
        .as_secs()
        .saturating_add(script.milestone_periods.saturating_mul(params.milestone_period_secs));
    if anniversary_at > clock.now().as_secs() {
        clock.set(anniversary_at);
    }
    let anniversaries = outcome(engine.manual_check_and_mint(bob, alice, clock.now()))?;
    let bonded = dashboards(&engine, &[alice, bob], &clock)?;

    let divorced = outcome(engine.divorce(bob, alice, clock.now()))?;
    let after = dashboards(&engine, &[alice, bob], &clock)?;

    Ok(json!({
        "pair_key": vow_crypto::pair_key(&alice, &bob),
        "elapsed": format_duration(clock.now().as_secs() - GENESIS),
        "periods": {
            "accrual": format_duration(params.accrual_period_secs),
            "milestone": format_duration(params.milestone_period_secs),
        },
        "steps": {
            "propose": proposed,
            "accept": accepted,
            "claim_yield": claimed,
            "anniversaries": anniversaries,
            "divorce": divorced,
        },
        "dashboards": { "bonded": bonded, "dissolved": after },
        "certificates": {
            "bond": bond_issuer.total_minted(),
            "anniversary": milestones.issuer().total_minted(),
        },
        "events": engine.events(),
    }))
}
