//! Bond records and the active-bond index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vow_types::{Identity, Nullifier, PairKey, Timestamp};

/// The recorded relationship between two identities.
///
/// Stored under the pair's [`PairKey`]. A later bond between the same two
/// identities overwrites this record in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    /// The proposer.
    pub partner_a: Identity,
    /// The acceptor.
    pub partner_b: Identity,
    pub nullifier_a: Nullifier,
    pub nullifier_b: Nullifier,
    pub bond_start: Timestamp,
    /// Accrual restarts from here after every claim or settlement.
    pub last_claim: Timestamp,
    /// Highest anniversary period already issued (0 = none).
    pub last_milestone: u32,
    pub active: bool,
}

impl Bond {
    pub fn is_participant(&self, who: &Identity) -> bool {
        self.partner_a == *who || self.partner_b == *who
    }

    /// The other participant, if `who` is one of them.
    pub fn partner_of(&self, who: &Identity) -> Option<Identity> {
        if self.partner_a == *who {
            Some(self.partner_b)
        } else if self.partner_b == *who {
            Some(self.partner_a)
        } else {
            None
        }
    }

    pub fn partners(&self) -> [Identity; 2] {
        [self.partner_a, self.partner_b]
    }
}

/// Bonds by pair key, the identity → active pair key lookup, and bond history.
///
/// Invariant: `active[id] == key` iff `bonds[key].active` and `bonds[key]`
/// lists `id` as a participant.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BondRegistry {
    bonds: HashMap<PairKey, Bond>,
    active: HashMap<Identity, PairKey>,
    /// One entry per formed bond, in formation order.
    history: Vec<PairKey>,
}

impl BondRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PairKey) -> Option<&Bond> {
        self.bonds.get(key)
    }

    /// The bond at `key`, only if it is active.
    pub fn get_active(&self, key: &PairKey) -> Option<&Bond> {
        self.bonds.get(key).filter(|b| b.active)
    }

    pub fn active_key(&self, who: &Identity) -> Option<PairKey> {
        self.active.get(who).copied()
    }

    pub fn is_bonded(&self, who: &Identity) -> bool {
        self.active.contains_key(who)
    }

    /// Current partner of `who`, if bonded.
    pub fn partner_of(&self, who: &Identity) -> Option<Identity> {
        let key = self.active.get(who)?;
        self.bonds.get(key)?.partner_of(who)
    }

    pub fn history(&self) -> &[PairKey] {
        &self.history
    }

    /// Number of pair keys that have ever held a bond.
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.bonds.values().filter(|b| b.active).count()
    }

    pub(crate) fn put(&mut self, key: PairKey, bond: Bond) -> Option<Bond> {
        self.bonds.insert(key, bond)
    }

    pub(crate) fn restore(&mut self, key: PairKey, previous: Option<Bond>) {
        match previous {
            Some(bond) => {
                self.bonds.insert(key, bond);
            }
            None => {
                self.bonds.remove(&key);
            }
        }
    }

    pub(crate) fn set_active(&mut self, who: Identity, key: Option<PairKey>) -> Option<PairKey> {
        match key {
            Some(key) => self.active.insert(who, key),
            None => self.active.remove(&who),
        }
    }

    pub(crate) fn push_history(&mut self, key: PairKey) {
        self.history.push(key);
    }

    pub(crate) fn pop_history(&mut self) -> Option<PairKey> {
        self.history.pop()
    }

    /// Check the active-index invariant in both directions.
    pub fn is_consistent(&self) -> bool {
        let forward = self.active.iter().all(|(who, key)| {
            self.bonds
                .get(key)
                .is_some_and(|b| b.active && b.is_participant(who))
        });
        let backward = self.bonds.iter().filter(|(_, b)| b.active).all(|(key, b)| {
            b.partners()
                .iter()
                .all(|p| self.active.get(p) == Some(key))
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> Identity {
        Identity::from_low_u64(n)
    }

    fn bond(a: u64, b: u64) -> Bond {
        Bond {
            partner_a: id(a),
            partner_b: id(b),
            nullifier_a: Nullifier::from_u64(a),
            nullifier_b: Nullifier::from_u64(b),
            bond_start: Timestamp::new(100),
            last_claim: Timestamp::new(100),
            last_milestone: 0,
            active: true,
        }
    }

    #[test]
    fn partner_lookup() {
        let b = bond(1, 2);
        assert_eq!(b.partner_of(&id(1)), Some(id(2)));
        assert_eq!(b.partner_of(&id(2)), Some(id(1)));
        assert_eq!(b.partner_of(&id(3)), None);
        assert!(!b.is_participant(&id(3)));
    }

    #[test]
    fn active_index_round_trip() {
        let mut reg = BondRegistry::new();
        let key = PairKey::new([1u8; 32]);
        reg.put(key, bond(1, 2));
        reg.set_active(id(1), Some(key));
        reg.set_active(id(2), Some(key));
        assert!(reg.is_consistent());
        assert_eq!(reg.partner_of(&id(1)), Some(id(2)));
        assert_eq!(reg.active_count(), 1);

        reg.set_active(id(2), None);
        assert!(!reg.is_consistent());
        assert!(!reg.is_bonded(&id(2)));
    }

    #[test]
    fn restore_previous_bond() {
        let mut reg = BondRegistry::new();
        let key = PairKey::new([2u8; 32]);
        let prev = reg.put(key, bond(1, 2));
        assert!(prev.is_none());
        let prev = reg.put(key, bond(3, 4));
        reg.restore(key, prev);
        assert_eq!(reg.get(&key).unwrap().partner_a, id(1));
        reg.restore(key, None);
        assert!(reg.get(&key).is_none());
    }

    #[test]
    fn inactive_bond_hidden_from_get_active() {
        let mut reg = BondRegistry::new();
        let key = PairKey::new([3u8; 32]);
        let mut b = bond(1, 2);
        b.active = false;
        reg.put(key, b);
        assert!(reg.get(&key).is_some());
        assert!(reg.get_active(&key).is_none());
        assert!(reg.is_consistent());
    }
}
