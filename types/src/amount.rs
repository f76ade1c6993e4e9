//! Reward amounts.
//!
//! Amounts are fixed-point integers (u128 raw units) to avoid floating-point errors.
//! One whole reward token is [`REWARD_UNIT`] raw units (18 decimals).

use serde::{de, Deserialize, Deserializer, Serializer};

/// Raw units per whole reward token.
pub const REWARD_UNIT: u128 = 1_000_000_000_000_000_000;

/// Render a raw amount as whole tokens with up to four decimals, trailing zeros trimmed.
pub fn format_reward(raw: u128) -> String {
    let whole = raw / REWARD_UNIT;
    let frac = (raw % REWARD_UNIT) / (REWARD_UNIT / 10_000);
    if frac == 0 {
        format!("{whole}")
    } else {
        let digits = format!("{frac:04}");
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}

/// Serde adapter for raw amounts.
///
/// Human-readable formats get a decimal string, since TOML integers stop at
/// `i64::MAX`; plain integers are accepted on input too. Binary formats keep
/// the native `u128`.
pub mod raw_amount {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(value)
        } else {
            serializer.serialize_u128(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Int(u64),
        }

        if deserializer.is_human_readable() {
            match Repr::deserialize(deserializer)? {
                Repr::Text(s) => s.trim().parse().map_err(de::Error::custom),
                Repr::Int(n) => Ok(u128::from(n)),
            }
        } else {
            u128::deserialize(deserializer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_amounts_have_no_decimals() {
        assert_eq!(format_reward(0), "0");
        assert_eq!(format_reward(50 * REWARD_UNIT), "50");
    }

    #[test]
    fn fractions_are_trimmed() {
        assert_eq!(format_reward(REWARD_UNIT + REWARD_UNIT / 2), "1.5");
        assert_eq!(format_reward(REWARD_UNIT / 100), "0.01");
    }

    #[test]
    fn dust_below_four_decimals_is_hidden() {
        assert_eq!(format_reward(1), "0");
    }
}
