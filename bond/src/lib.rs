//! Bond lifecycle engine.
//!
//! Two identities that each hold a proof of personhood can form a bond:
//! one proposes, the other accepts. An active bond accrues a shared yield
//! `periods × unit_reward` that either partner can claim (split evenly),
//! earns one anniversary certificate per partner per milestone period, and
//! can be dissolved by either partner, which settles any pending yield.
//!
//! This crate handles:
//! - The proposal registry and its O(1) incoming-proposal index
//! - Bond records and the one-active-bond-per-identity index
//! - Yield accrual and anniversary catch-up arithmetic
//! - Per-domain nullifier replay protection
//! - All-or-nothing operations via a rollback-on-drop write batch
//! - The event log, snapshots and engine configuration

pub mod accrual;
mod batch;
pub mod bond;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod milestone;
pub mod nullifier;
pub mod proposal;
pub mod state;
pub mod view;

pub use bond::{Bond, BondRegistry};
pub use config::EngineConfig;
pub use engine::{Acceptance, BondEngine, CatchUpReceipt, Collaborators, Settlement, YieldReceipt};
pub use error::BondError;
pub use event::{BondEvent, EventBus, EventLog, LoggedEvent};
pub use milestone::CatchUpPlan;
pub use nullifier::{ActionDomain, NullifierGuard};
pub use proposal::{Proposal, ProposalRegistry};
pub use state::BondState;
pub use view::{DashboardView, PairView};
pub use vow_crypto::pair_key;
