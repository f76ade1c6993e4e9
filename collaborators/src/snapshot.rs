use crate::error::CollaboratorError;

/// Durable home for serialized engine state.
///
/// Uses opaque bytes so the store does not depend on the `vow-bond` crate;
/// the engine serializes and deserializes its own state.
pub trait SnapshotStore: Send + Sync {
    fn put_snapshot(&self, bytes: &[u8]) -> Result<(), CollaboratorError>;
    fn get_snapshot(&self) -> Result<Option<Vec<u8>>, CollaboratorError>;
}
