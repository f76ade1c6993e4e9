//! Non-transferable certificate issuers.
//!
//! Issuers enforce their own transfer and metadata-freeze policy. The core
//! only mints and, for anniversaries, asks how far the schedule reaches.

use crate::error::CollaboratorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use vow_types::{Identity, PairKey, Timestamp};

/// Identifier assigned by an issuer to a minted certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CertificateId(pub u64);

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a certificate attests to. Encoding is left to the issuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateMetadata {
    /// Minted to each partner when a bond is formed.
    Bond {
        pair_key: PairKey,
        partner: Identity,
        bond_start: Timestamp,
    },
    /// Minted to each partner once per completed milestone period.
    Anniversary {
        pair_key: PairKey,
        partner: Identity,
        period: u32,
    },
}

pub trait CertificateIssuer: Send + Sync {
    /// Mint a certificate to `owner`. `minter` is the identity the core acts as.
    fn mint_certificate(
        &self,
        minter: &Identity,
        owner: &Identity,
        metadata: &CertificateMetadata,
    ) -> Result<CertificateId, CollaboratorError>;
}

/// Anniversary issuer: a certificate issuer with a bounded milestone schedule.
pub trait MilestoneIssuer: CertificateIssuer {
    /// Highest milestone period for which metadata is defined (0 if none).
    fn schedule_ceiling(&self) -> u32;
}
