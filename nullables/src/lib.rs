//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the bonding core talks to (identity verifier, reward
//! ledger, certificate issuers, snapshot store) plus the clock has an
//! in-memory implementation here that:
//! - Returns deterministic values
//! - Can be controlled programmatically (including injected failures)
//! - Never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod clock;
pub mod issuer;
pub mod ledger;
pub mod store;
pub mod verifier;

pub use clock::NullClock;
pub use issuer::{NullCertificateIssuer, NullMilestoneIssuer, MintedCertificate};
pub use ledger::NullRewardLedger;
pub use store::NullSnapshotStore;
pub use verifier::{NullVerifier, RecordedVerification};

use std::sync::Mutex;

/// Count down an injected-failure budget. Returns `true` when the current
/// call must fail: `Some(0)` fails every call, `Some(n)` lets `n` calls through first.
pub(crate) fn trip(budget: &Mutex<Option<usize>>) -> bool {
    let mut slot = budget.lock().unwrap();
    match slot.as_mut() {
        None => false,
        Some(0) => true,
        Some(n) => {
            *n -= 1;
            false
        }
    }
}
