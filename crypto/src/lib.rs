//! Hashing primitives for the VOW protocol.
//!
//! - **Blake2b-256** for every digest in the system
//! - **hash-to-field**: digest shifted right by 8 bits so it fits the verifier's scalar field
//! - Proof public inputs: caller signal and action-domain identifiers
//! - Symmetric pair keys for unordered identity pairs

pub mod field;
pub mod hash;
pub mod pair;

pub use field::{action_id, hash_to_field, signal_for};
pub use hash::{blake2b_256, blake2b_256_multi};
pub use pair::pair_key;
