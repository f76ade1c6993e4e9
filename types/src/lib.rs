//! Fundamental types for the VOW bonding protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, pair keys, proof field elements, reward amounts, timestamps and
//! the per-deployment bond parameters.

pub mod amount;
pub mod error;
pub mod hash;
pub mod identity;
pub mod params;
pub mod proof;
pub mod time;

pub use amount::{format_reward, REWARD_UNIT};
pub use error::TypesError;
pub use hash::{FieldElement, Nullifier, PairKey};
pub use identity::Identity;
pub use params::BondParams;
pub use proof::{Proof, ProofBundle};
pub use time::Timestamp;
