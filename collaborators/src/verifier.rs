//! Personhood proof verification.

use crate::error::CollaboratorError;
use vow_types::{FieldElement, Nullifier, Proof};

/// Public inputs and proof for a single verification call.
#[derive(Clone, Debug)]
pub struct VerificationRequest<'a> {
    pub root: FieldElement,
    /// Action-domain identifier the nullifier is scoped to.
    pub action_id: FieldElement,
    /// Hash-to-field of the caller identity.
    pub signal: FieldElement,
    pub nullifier: Nullifier,
    pub proof: &'a Proof,
}

/// An external zero-knowledge identity verifier, treated as a pass/fail oracle.
pub trait IdentityVerifier: Send + Sync {
    /// Verify a proof of personhood. `Ok(())` means the proof is valid for
    /// the given signal within the given action domain.
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<(), CollaboratorError>;
}
