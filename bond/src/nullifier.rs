//! Proof replay guard.
//!
//! Nullifiers are consumed per action domain: the same nullifier may appear
//! once under "propose" and once under "accept", never twice under one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use vow_types::Nullifier;

/// The named contexts a personhood proof can be produced for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionDomain {
    Propose,
    Accept,
}

impl ActionDomain {
    /// The action string hashed into the domain identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Propose => "propose",
            Self::Accept => "accept",
        }
    }
}

impl fmt::Display for ActionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NullifierGuard {
    propose: HashSet<Nullifier>,
    accept: HashSet<Nullifier>,
}

impl NullifierGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, domain: ActionDomain) -> &HashSet<Nullifier> {
        match domain {
            ActionDomain::Propose => &self.propose,
            ActionDomain::Accept => &self.accept,
        }
    }

    fn set_mut(&mut self, domain: ActionDomain) -> &mut HashSet<Nullifier> {
        match domain {
            ActionDomain::Propose => &mut self.propose,
            ActionDomain::Accept => &mut self.accept,
        }
    }

    pub fn is_consumed(&self, domain: ActionDomain, nullifier: &Nullifier) -> bool {
        self.set(domain).contains(nullifier)
    }

    /// Mark a nullifier consumed. Returns `false` if it already was.
    pub(crate) fn consume(&mut self, domain: ActionDomain, nullifier: Nullifier) -> bool {
        self.set_mut(domain).insert(nullifier)
    }

    pub(crate) fn release(&mut self, domain: ActionDomain, nullifier: &Nullifier) {
        self.set_mut(domain).remove(nullifier);
    }

    pub fn consumed_count(&self, domain: ActionDomain) -> usize {
        self.set(domain).len()
    }
}
