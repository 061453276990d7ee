#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for scrypt key derivation.

use lifelog_crypto_core::kdf::{derive, verify, ScryptParams};
use proptest::prelude::*;

/// Cheap params for fast property tests.
const PROP_PARAMS: ScryptParams = ScryptParams {
    log_n: 4,
    r: 8,
    p: 1,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Derivation is deterministic for any password/salt pair.
    #[test]
    fn derive_is_deterministic(
        password in proptest::collection::vec(any::<u8>(), 1..128),
        salt in proptest::collection::vec(any::<u8>(), 16..64),
    ) {
        let a = derive(&password, &salt, &PROP_PARAMS).expect("derive should succeed");
        let b = derive(&password, &salt, &PROP_PARAMS).expect("derive should succeed");
        prop_assert_eq!(a.expose(), b.expose());
    }

    /// A derived hash always verifies against the password it came from.
    #[test]
    fn derived_hash_verifies(
        password in proptest::collection::vec(any::<u8>(), 1..64),
        salt in proptest::collection::vec(any::<u8>(), 16..32),
    ) {
        let hash = derive(&password, &salt, &PROP_PARAMS).expect("derive should succeed");
        prop_assert!(verify(&password, &salt, &PROP_PARAMS, hash.expose()).expect("verify"));
    }

    /// Changing the password changes the key.
    #[test]
    fn different_passwords_different_keys(
        password in proptest::collection::vec(any::<u8>(), 1..64),
    ) {
        let salt = b"proptest_salt_16b";
        let mut other = password.clone();
        other.push(0x01);

        let key_a = derive(&password, salt, &PROP_PARAMS).expect("derive should succeed");
        let key_b = derive(&other, salt, &PROP_PARAMS).expect("derive should succeed");
        prop_assert_ne!(key_a.expose(), key_b.expose());
    }
}
