//! Nullable identity verifier.

use std::collections::HashSet;
use std::sync::Mutex;
use vow_collaborators::{CollaboratorError, IdentityVerifier, VerificationRequest};
use vow_types::{FieldElement, Nullifier};

/// Public inputs of a verification call, as observed by [`NullVerifier`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedVerification {
    pub root: FieldElement,
    pub action_id: FieldElement,
    pub signal: FieldElement,
    pub nullifier: Nullifier,
}

/// A verifier that accepts every proof unless told otherwise.
///
/// Individual nullifiers can be marked invalid, or the verifier can be
/// switched to reject everything. Every call is recorded.
pub struct NullVerifier {
    reject_all: Mutex<bool>,
    rejected: Mutex<HashSet<Nullifier>>,
    calls: Mutex<Vec<RecordedVerification>>,
}

impl NullVerifier {
    /// A verifier that passes every proof.
    pub fn accepting() -> Self {
        Self {
            reject_all: Mutex::new(false),
            rejected: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A verifier that fails every proof.
    pub fn rejecting() -> Self {
        let v = Self::accepting();
        *v.reject_all.lock().unwrap() = true;
        v
    }

    pub fn set_reject_all(&self, reject: bool) {
        *self.reject_all.lock().unwrap() = reject;
    }

    /// Make proofs carrying `nullifier` fail verification.
    pub fn reject_nullifier(&self, nullifier: Nullifier) {
        self.rejected.lock().unwrap().insert(nullifier);
    }

    pub fn calls(&self) -> Vec<RecordedVerification> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for NullVerifier {
    fn default() -> Self {
        Self::accepting()
    }
}

impl IdentityVerifier for NullVerifier {
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<(), CollaboratorError> {
        self.calls.lock().unwrap().push(RecordedVerification {
            root: request.root,
            action_id: request.action_id,
            signal: request.signal,
            nullifier: request.nullifier,
        });
        if *self.reject_all.lock().unwrap() {
            return Err(CollaboratorError::VerificationFailed("rejecting verifier".into()));
        }
        if self.rejected.lock().unwrap().contains(&request.nullifier) {
            return Err(CollaboratorError::VerificationFailed(format!(
                "nullifier {} marked invalid",
                request.nullifier
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vow_types::Proof;

    fn request(proof: &Proof, nullifier: u64) -> VerificationRequest<'_> {
        VerificationRequest {
            root: FieldElement::from_u64(1),
            action_id: FieldElement::from_u64(2),
            signal: FieldElement::from_u64(3),
            nullifier: Nullifier::from_u64(nullifier),
            proof,
        }
    }

    #[test]
    fn accepting_records_calls() {
        let v = NullVerifier::accepting();
        let proof = Proof::default();
        assert!(v.verify(&request(&proof, 9)).is_ok());
        assert_eq!(v.call_count(), 1);
        assert_eq!(v.calls()[0].nullifier, Nullifier::from_u64(9));
    }

    #[test]
    fn rejected_nullifier_fails() {
        let v = NullVerifier::accepting();
        v.reject_nullifier(Nullifier::from_u64(4));
        let proof = Proof::default();
        assert!(v.verify(&request(&proof, 3)).is_ok());
        assert!(matches!(
            v.verify(&request(&proof, 4)),
            Err(CollaboratorError::VerificationFailed(_))
        ));
    }

    #[test]
    fn rejecting_fails_everything() {
        let v = NullVerifier::rejecting();
        let proof = Proof::default();
        assert!(v.verify(&request(&proof, 1)).is_err());
        v.set_reject_all(false);
        assert!(v.verify(&request(&proof, 1)).is_ok());
    }
}
