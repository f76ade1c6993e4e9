//! Blake2b-256, the only digest used by the protocol.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Digest of the concatenation of `parts`, without building the concatenation.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    parts
        .iter()
        .fold(Blake2b256::new(), |hasher, part| hasher.chain_update(part))
        .finalize()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_digest() {
        assert_eq!(blake2b_256(b"vow"), blake2b_256(b"vow"));
        assert_ne!(blake2b_256(b"propose"), blake2b_256(b"accept"));
    }

    #[test]
    fn multi_matches_concatenation() {
        let joined = blake2b_256(b"proposeaccept");
        assert_eq!(blake2b_256_multi(&[b"propose", b"accept"]), joined);
        assert_eq!(blake2b_256_multi(&[b"pro", b"", b"poseaccept"]), joined);
    }

    #[test]
    fn known_empty_digest_prefix() {
        // Blake2b-256("") = 0e5751c0...
        assert_eq!(&blake2b_256(b"")[..4], &[0x0e, 0x57, 0x51, 0xc0]);
    }
}
