//! Abstract collaborator traits for the VOW bonding core.
//!
//! The core never owns the identity verifier, the reward ledger or the
//! certificate issuers; it reaches them through these traits. Production
//! deployments wire real backends, tests use the in-memory nullables.
//! All calls are synchronous and either pass or fail with a
//! [`CollaboratorError`].

pub mod certificate;
pub mod error;
pub mod ledger;
pub mod snapshot;
pub mod verifier;

pub use certificate::{CertificateId, CertificateIssuer, CertificateMetadata, MilestoneIssuer};
pub use error::CollaboratorError;
pub use ledger::RewardLedger;
pub use snapshot::SnapshotStore;
pub use verifier::{IdentityVerifier, VerificationRequest};
