//! Personhood proof payloads.
//!
//! The core never inspects a proof; it forwards it to the identity verifier
//! together with the public inputs (root, signal, nullifier, action domain).

use crate::hash::{FieldElement, Nullifier};
use serde::{Deserialize, Serialize};

/// An opaque zero-knowledge proof, eight packed field elements.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Proof(pub [FieldElement; 8]);

/// Everything a caller supplies to prove personhood for one action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// Merkle root of the identity group the proof was generated against.
    pub root: FieldElement,
    /// Nullifier hash for this (identity, action domain) pair.
    pub nullifier: Nullifier,
    pub proof: Proof,
}

impl ProofBundle {
    pub fn new(root: FieldElement, nullifier: Nullifier, proof: Proof) -> Self {
        Self {
            root,
            nullifier,
            proof,
        }
    }
}
