use proptest::prelude::*;

use vow_crypto::{hash_to_field, pair_key, signal_for};
use vow_types::Identity;

proptest! {
    /// Pair keys ignore argument order.
    #[test]
    fn pair_key_symmetric(
        a in prop::array::uniform20(0u8..),
        b in prop::array::uniform20(0u8..),
    ) {
        let (a, b) = (Identity::new(a), Identity::new(b));
        prop_assert_eq!(pair_key(&a, &b), pair_key(&b, &a));
    }

    /// Hash-to-field output always fits below 2^248.
    #[test]
    fn hash_to_field_clears_top_byte(data in prop::collection::vec(any::<u8>(), 0..128)) {
        prop_assert_eq!(hash_to_field(&data).as_bytes()[0], 0);
    }

    /// Signals are a pure function of the identity.
    #[test]
    fn signal_deterministic(bytes in prop::array::uniform20(0u8..)) {
        let id = Identity::new(bytes);
        prop_assert_eq!(signal_for(&id), signal_for(&id));
    }
}
