//! Nullable snapshot store, thread-safe in-memory storage for testing.

use std::sync::Mutex;
use vow_collaborators::{CollaboratorError, SnapshotStore};

/// Holds the most recent snapshot in memory.
#[derive(Default)]
pub struct NullSnapshotStore {
    snapshot: Mutex<Option<Vec<u8>>>,
    writes: Mutex<u64>,
}

impl NullSnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots written so far.
    pub fn write_count(&self) -> u64 {
        *self.writes.lock().unwrap()
    }
}

impl SnapshotStore for NullSnapshotStore {
    fn put_snapshot(&self, bytes: &[u8]) -> Result<(), CollaboratorError> {
        *self.snapshot.lock().unwrap() = Some(bytes.to_vec());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    fn get_snapshot(&self) -> Result<Option<Vec<u8>>, CollaboratorError> {
        Ok(self.snapshot.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_latest_snapshot() {
        let store = NullSnapshotStore::new();
        assert!(store.get_snapshot().unwrap().is_none());
        store.put_snapshot(b"one").unwrap();
        store.put_snapshot(b"two").unwrap();
        assert_eq!(store.get_snapshot().unwrap().unwrap(), b"two");
        assert_eq!(store.write_count(), 2);
    }
}
