//! Participant identity.

use crate::error::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A participant identity, a 20-byte account reference.
///
/// Identities are totally ordered by their byte representation; pair keys
/// rely on that order to be symmetric. [`Identity::ZERO`] is the null
/// identity and can never take part in a bond.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Identity([u8; 20]);

impl Identity {
    /// The null identity.
    pub const ZERO: Self = Self([0u8; 20]);

    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an identity whose last eight bytes hold `n` (big-endian).
    ///
    /// Handy for fixtures and simulations; `from_low_u64(0)` is the null identity.
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity(0x{}\u{2026})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Identity {
    type Err = TypesError;

    /// Parse a hex identity, with or without the `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| TypesError::InvalidIdentity(e.to_string()))?;
        let arr: [u8; 20] = bytes.try_into().map_err(|v: Vec<u8>| {
            TypesError::InvalidIdentity(format!("expected 20 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }
}

/// Hex string in human-readable formats (JSON, TOML), raw bytes otherwise.
impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 20]>::deserialize(deserializer).map(Self)
        }
    }
}

impl From<[u8; 20]> for Identity {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_null() {
        assert!(Identity::ZERO.is_zero());
        assert!(Identity::from_low_u64(0).is_zero());
        assert!(!Identity::from_low_u64(1).is_zero());
    }

    #[test]
    fn ordering_follows_bytes() {
        assert!(Identity::from_low_u64(1) < Identity::from_low_u64(2));
        assert!(Identity::from_low_u64(255) < Identity::from_low_u64(256));
    }

    #[test]
    fn display_and_parse_agree() {
        let id = Identity::from_low_u64(0xdead_beef);
        let text = id.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 2 + 40);
        assert_eq!(text.parse::<Identity>().unwrap(), id);
        assert_eq!(text.trim_start_matches("0x").parse::<Identity>().unwrap(), id);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!("0x1234".parse::<Identity>().is_err());
        assert!("zz".parse::<Identity>().is_err());
    }

    #[test]
    fn json_uses_hex_string() {
        let id = Identity::from_low_u64(0x2a);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
