//! Hash-to-field and the public inputs derived from it.
//!
//! The verifier works over a ~254-bit scalar field, so a 256-bit digest is
//! shifted right by one byte before use. Both the caller signal and the
//! action-domain identifier go through the same mapping.

use crate::hash::{blake2b_256, blake2b_256_multi};
use vow_types::{FieldElement, Identity};

fn shift_right_8(digest: [u8; 32]) -> FieldElement {
    let mut out = [0u8; 32];
    out[1..].copy_from_slice(&digest[..31]);
    FieldElement::new(out)
}

/// Hash arbitrary bytes into the verifier's field: `blake2b_256(data) >> 8`.
pub fn hash_to_field(data: &[u8]) -> FieldElement {
    shift_right_8(blake2b_256(data))
}

/// The signal that binds a proof to a specific caller.
pub fn signal_for(identity: &Identity) -> FieldElement {
    hash_to_field(identity.as_bytes())
}

/// Action-domain identifier: `hash_to_field(hash_to_field(app_id) || action)`.
///
/// Nullifiers are scoped by this value, so a proof produced for one action
/// cannot be replayed for another.
pub fn action_id(app_id: &str, action: &str) -> FieldElement {
    let app = hash_to_field(app_id.as_bytes());
    shift_right_8(blake2b_256_multi(&[app.as_bytes(), action.as_bytes()]))
}
