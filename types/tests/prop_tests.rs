use proptest::prelude::*;

use vow_types::{FieldElement, Identity, Nullifier, PairKey, Timestamp};

proptest! {
    /// Identity display always parses back to the same identity.
    #[test]
    fn identity_display_parses_back(bytes in prop::array::uniform20(0u8..)) {
        let id = Identity::new(bytes);
        let parsed: Identity = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// Identity ordering agrees with lexicographic byte ordering.
    #[test]
    fn identity_order_matches_bytes(
        a in prop::array::uniform20(0u8..),
        b in prop::array::uniform20(0u8..),
    ) {
        prop_assert_eq!(Identity::new(a).cmp(&Identity::new(b)), a.cmp(&b));
    }

    /// Identity::is_zero is true only for all-zero bytes.
    #[test]
    fn identity_is_zero_correct(bytes in prop::array::uniform20(0u8..)) {
        prop_assert_eq!(Identity::new(bytes).is_zero(), bytes == [0u8; 20]);
    }

    /// PairKey survives a bincode encode/decode unchanged.
    #[test]
    fn pair_key_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let key = PairKey::new(bytes);
        let encoded = bincode::serialize(&key).unwrap();
        let decoded: PairKey = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, key);
    }

    /// Nullifiers built from distinct integers never collide.
    #[test]
    fn nullifier_from_u64_injective(a in any::<u64>(), b in any::<u64>()) {
        prop_assume!(a != b);
        prop_assert_ne!(Nullifier::from_u64(a), Nullifier::from_u64(b));
    }

    /// FieldElement ordering matches the integer it was built from.
    #[test]
    fn field_element_order_matches_integer(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(FieldElement::from_u64(a).cmp(&FieldElement::from_u64(b)), a.cmp(&b));
    }

    /// Whole periods never decrease as time moves forward.
    #[test]
    fn whole_periods_monotonic(
        start in 0u64..1_000_000,
        t1 in 0u64..1_000_000,
        dt in 0u64..1_000_000,
        period in 1u64..10_000,
    ) {
        let s = Timestamp::new(start);
        let p1 = s.whole_periods_until(Timestamp::new(t1), period);
        let p2 = s.whole_periods_until(Timestamp::new(t1 + dt), period);
        prop_assert!(p2 >= p1);
    }
}
