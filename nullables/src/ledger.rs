//! Nullable reward ledger.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use vow_collaborators::{CollaboratorError, RewardLedger};
use vow_types::Identity;

/// In-memory fungible balance store that only its authorised minters may inflate.
pub struct NullRewardLedger {
    minters: Mutex<HashSet<Identity>>,
    balances: Mutex<HashMap<Identity, u128>>,
    fail_budget: Mutex<Option<usize>>,
}

impl NullRewardLedger {
    pub fn new(minter: Identity) -> Self {
        let mut minters = HashSet::new();
        minters.insert(minter);
        Self {
            minters: Mutex::new(minters),
            balances: Mutex::new(HashMap::new()),
            fail_budget: Mutex::new(None),
        }
    }

    pub fn authorize(&self, minter: Identity) {
        self.minters.lock().unwrap().insert(minter);
    }

    /// Let `successes` more mints through, then fail every mint with a backend error.
    pub fn fail_after(&self, successes: usize) {
        *self.fail_budget.lock().unwrap() = Some(successes);
    }

    pub fn heal(&self) {
        *self.fail_budget.lock().unwrap() = None;
    }

    /// Balance without the `Result` wrapper, for assertions.
    pub fn balance(&self, who: &Identity) -> u128 {
        self.balances.lock().unwrap().get(who).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.balances.lock().unwrap().values().sum()
    }
}

impl RewardLedger for NullRewardLedger {
    fn mint(&self, minter: &Identity, to: &Identity, amount: u128) -> Result<(), CollaboratorError> {
        if !self.minters.lock().unwrap().contains(minter) {
            return Err(CollaboratorError::Unauthorized(*minter));
        }
        if crate::trip(&self.fail_budget) {
            return Err(CollaboratorError::Backend("injected ledger failure".into()));
        }
        let mut balances = self.balances.lock().unwrap();
        let entry = balances.entry(*to).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| CollaboratorError::Backend("balance overflow".into()))?;
        Ok(())
    }

    fn balance_of(&self, who: &Identity) -> Result<u128, CollaboratorError> {
        Ok(self.balance(who))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_accumulates() {
        let core = Identity::from_low_u64(0xc0);
        let alice = Identity::from_low_u64(1);
        let ledger = NullRewardLedger::new(core);
        ledger.mint(&core, &alice, 30).unwrap();
        ledger.mint(&core, &alice, 12).unwrap();
        assert_eq!(ledger.balance_of(&alice).unwrap(), 42);
        assert_eq!(ledger.total_supply(), 42);
    }

    #[test]
    fn stranger_cannot_mint() {
        let core = Identity::from_low_u64(0xc0);
        let alice = Identity::from_low_u64(1);
        let ledger = NullRewardLedger::new(core);
        assert!(matches!(
            ledger.mint(&alice, &alice, 1),
            Err(CollaboratorError::Unauthorized(_))
        ));
        ledger.authorize(alice);
        assert!(ledger.mint(&alice, &alice, 1).is_ok());
    }

    #[test]
    fn injected_failure_leaves_balance() {
        let core = Identity::from_low_u64(0xc0);
        let alice = Identity::from_low_u64(1);
        let ledger = NullRewardLedger::new(core);
        ledger.fail_after(0);
        assert!(ledger.mint(&core, &alice, 5).is_err());
        assert_eq!(ledger.balance(&alice), 0);
    }
}
