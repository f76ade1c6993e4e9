//! Symmetric pair keys.

use crate::hash::blake2b_256_multi;
use vow_types::{Identity, PairKey};

/// Derive the key for an unordered pair: `blake2b(min(a, b) || max(a, b))`.
///
/// `pair_key(a, b) == pair_key(b, a)` for every `a`, `b`.
pub fn pair_key(a: &Identity, b: &Identity) -> PairKey {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    PairKey::new(blake2b_256_multi(&[lo.as_bytes(), hi.as_bytes()]))
}
