//! Records emitted by the bond engine for external indexers.
//!
//! Events are staged inside a write batch and only reach the [`EventLog`]
//! (and [`EventBus`] subscribers) once the operation commits.

use crate::nullifier::ActionDomain;
use serde::{Deserialize, Serialize};
use vow_types::{Identity, Nullifier, PairKey, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondEvent {
    ProposalCreated {
        proposer: Identity,
        proposed: Identity,
        at: Timestamp,
    },
    ProposalAccepted {
        proposer: Identity,
        acceptor: Identity,
        pair_key: PairKey,
        at: Timestamp,
    },
    ProposalCancelled {
        proposer: Identity,
        proposed: Identity,
        at: Timestamp,
    },
    YieldClaimed {
        pair_key: PairKey,
        claimed_by: Identity,
        #[serde(with = "vow_types::amount::raw_amount")]
        total: u128,
        #[serde(with = "vow_types::amount::raw_amount")]
        per_partner: u128,
        at: Timestamp,
    },
    AnniversaryAchieved {
        pair_key: PairKey,
        period: u32,
        at: Timestamp,
    },
    BondDissolved {
        pair_key: PairKey,
        dissolved_by: Identity,
        #[serde(with = "vow_types::amount::raw_amount")]
        settled: u128,
        at: Timestamp,
    },
    NullifierConsumed {
        domain: ActionDomain,
        nullifier: Nullifier,
    },
}

/// An event with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub seq: u64,
    pub event: BondEvent,
}

/// Append-only event log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, event: BondEvent) -> u64 {
        let seq = self.records.len() as u64;
        self.records.push(LoggedEvent { seq, event });
        seq
    }

    pub fn records(&self) -> &[LoggedEvent] {
        &self.records
    }

    /// Records with `seq >= from`, for indexers resuming from a cursor.
    pub fn since(&self, from: u64) -> &[LoggedEvent] {
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(self.records.len());
        &self.records[start..]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Synchronous fan-out of committed events.
///
/// Listeners are invoked inline after commit; keep handlers fast. They only
/// receive events and cannot reach back into the engine.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&BondEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&BondEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &BondEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn cancelled(n: u64) -> BondEvent {
        BondEvent::ProposalCancelled {
            proposer: Identity::from_low_u64(n),
            proposed: Identity::from_low_u64(n + 1),
            at: Timestamp::new(n),
        }
    }

    #[test]
    fn log_assigns_sequence_numbers() {
        let mut log = EventLog::new();
        assert_eq!(log.append(cancelled(1)), 0);
        assert_eq!(log.append(cancelled(2)), 1);
        assert_eq!(log.since(1).len(), 1);
        assert_eq!(log.since(1)[0].event, cancelled(2));
        assert!(log.since(99).is_empty());
    }

    #[test]
    fn bus_fans_out_to_every_listener() {
        let mut bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let c = Arc::clone(&counter);
            bus.subscribe(Box::new(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            }));
        }
        bus.emit(&cancelled(1));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
