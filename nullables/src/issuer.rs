//! Nullable certificate issuers.

use std::collections::HashSet;
use std::sync::Mutex;
use vow_collaborators::{
    CertificateId, CertificateIssuer, CertificateMetadata, CollaboratorError, MilestoneIssuer,
};
use vow_types::Identity;

/// A certificate as recorded by a nullable issuer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintedCertificate {
    pub id: CertificateId,
    pub owner: Identity,
    pub metadata: CertificateMetadata,
}

/// In-memory soulbound certificate issuer.
///
/// Only authorised minters may mint; ids are sequential from 1.
pub struct NullCertificateIssuer {
    minters: Mutex<HashSet<Identity>>,
    minted: Mutex<Vec<MintedCertificate>>,
    fail_budget: Mutex<Option<usize>>,
}

impl NullCertificateIssuer {
    pub fn new(minter: Identity) -> Self {
        let mut minters = HashSet::new();
        minters.insert(minter);
        Self {
            minters: Mutex::new(minters),
            minted: Mutex::new(Vec::new()),
            fail_budget: Mutex::new(None),
        }
    }

    pub fn authorize(&self, minter: Identity) {
        self.minters.lock().unwrap().insert(minter);
    }

    pub fn revoke(&self, minter: &Identity) {
        self.minters.lock().unwrap().remove(minter);
    }

    /// Let `successes` more mints through, then fail every mint with a backend error.
    pub fn fail_after(&self, successes: usize) {
        *self.fail_budget.lock().unwrap() = Some(successes);
    }

    /// Clear any injected failure.
    pub fn heal(&self) {
        *self.fail_budget.lock().unwrap() = None;
    }

    pub fn minted(&self) -> Vec<MintedCertificate> {
        self.minted.lock().unwrap().clone()
    }

    pub fn total_minted(&self) -> usize {
        self.minted.lock().unwrap().len()
    }

    pub fn owned_by(&self, owner: &Identity) -> Vec<MintedCertificate> {
        self.minted
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner == *owner)
            .cloned()
            .collect()
    }
}

impl CertificateIssuer for NullCertificateIssuer {
    fn mint_certificate(
        &self,
        minter: &Identity,
        owner: &Identity,
        metadata: &CertificateMetadata,
    ) -> Result<CertificateId, CollaboratorError> {
        if !self.minters.lock().unwrap().contains(minter) {
            return Err(CollaboratorError::Unauthorized(*minter));
        }
        if crate::trip(&self.fail_budget) {
            return Err(CollaboratorError::Backend("injected mint failure".into()));
        }
        let mut minted = self.minted.lock().unwrap();
        let id = CertificateId(minted.len() as u64 + 1);
        minted.push(MintedCertificate {
            id,
            owner: *owner,
            metadata: metadata.clone(),
        });
        tracing::trace!(%id, %owner, "null issuer minted certificate");
        Ok(id)
    }
}

/// In-memory anniversary issuer with an extendable, freezable schedule.
///
/// Periods `1..=ceiling` have metadata defined. Minting an anniversary beyond
/// the ceiling fails with [`CollaboratorError::ScheduleNotFound`].
pub struct NullMilestoneIssuer {
    inner: NullCertificateIssuer,
    ceiling: Mutex<u32>,
    frozen: Mutex<bool>,
}

impl NullMilestoneIssuer {
    pub fn new(minter: Identity, ceiling: u32) -> Self {
        Self {
            inner: NullCertificateIssuer::new(minter),
            ceiling: Mutex::new(ceiling),
            frozen: Mutex::new(false),
        }
    }

    /// Define metadata for every period up to `ceiling`.
    pub fn extend_schedule(&self, ceiling: u32) -> Result<(), CollaboratorError> {
        if self.is_frozen() {
            return Err(CollaboratorError::Frozen);
        }
        let mut current = self.ceiling.lock().unwrap();
        *current = (*current).max(ceiling);
        Ok(())
    }

    /// Permanently lock the schedule at its current ceiling.
    pub fn freeze(&self) {
        *self.frozen.lock().unwrap() = true;
    }

    pub fn is_frozen(&self) -> bool {
        *self.frozen.lock().unwrap()
    }

    /// Access the underlying issuer for assertions and failure injection.
    pub fn issuer(&self) -> &NullCertificateIssuer {
        &self.inner
    }
}

impl CertificateIssuer for NullMilestoneIssuer {
    fn mint_certificate(
        &self,
        minter: &Identity,
        owner: &Identity,
        metadata: &CertificateMetadata,
    ) -> Result<CertificateId, CollaboratorError> {
        if let CertificateMetadata::Anniversary { period, .. } = metadata {
            if *period == 0 || *period > *self.ceiling.lock().unwrap() {
                return Err(CollaboratorError::ScheduleNotFound(*period));
            }
        }
        self.inner.mint_certificate(minter, owner, metadata)
    }
}

impl MilestoneIssuer for NullMilestoneIssuer {
    fn schedule_ceiling(&self) -> u32 {
        *self.ceiling.lock().unwrap()
    }
}
