//! Fungible reward ledger.

use crate::error::CollaboratorError;
use vow_types::Identity;

/// A mint-capable balance store. Ledgers reject minters they have not authorised.
pub trait RewardLedger: Send + Sync {
    fn mint(&self, minter: &Identity, to: &Identity, amount: u128) -> Result<(), CollaboratorError>;

    /// Current balance in raw units.
    fn balance_of(&self, who: &Identity) -> Result<u128, CollaboratorError>;
}
