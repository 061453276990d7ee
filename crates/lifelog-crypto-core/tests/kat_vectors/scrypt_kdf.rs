//! RFC 7914 Section 12: scrypt Known-Answer Test vectors.
//!
//! The RFC salts are shorter than the 16-byte minimum our `derive()`
//! enforces, so the exact vectors run against the `scrypt` crate directly.
//! `derive()` is checked against the same crate with a full-length salt.
//!
//! The final scrypt step is PBKDF2, whose output blocks are independent,
//! so a 32-byte derivation equals the first half of the 64-byte vector.

use lifelog_crypto_core::kdf::{derive, ScryptParams};

fn raw_scrypt(password: &[u8], salt: &[u8], log_n: u8, r: u32, p: u32) -> [u8; 64] {
    let params = scrypt::Params::new(log_n, r, p, 64).expect("params should be valid");
    let mut out = [0u8; 64];
    scrypt::scrypt(password, salt, &params, &mut out).expect("scrypt should succeed");
    out
}

/// RFC 7914 vector 1: P = "", S = "", N = 16, r = 1, p = 1.
#[test]
fn rfc7914_vector_1_empty_inputs() {
    let expected: [u8; 64] = [
        0x77, 0xd6, 0x57, 0x62, 0x38, 0x65, 0x7b, 0x20, 0x3b, 0x19, 0xca, 0x42, 0xc1, 0x8a, 0x04,
        0x97, 0xf1, 0x6b, 0x48, 0x44, 0xe3, 0x07, 0x4a, 0xe8, 0xdf, 0xdf, 0xfa, 0x3f, 0xed, 0xe2,
        0x14, 0x42, 0xfc, 0xd0, 0x06, 0x9d, 0xed, 0x09, 0x48, 0xf8, 0x32, 0x6a, 0x75, 0x3a, 0x0f,
        0xc8, 0x1f, 0x17, 0xe8, 0xd3, 0xe0, 0xfb, 0x2e, 0x0d, 0x36, 0x28, 0xcf, 0x35, 0xe2, 0x0c,
        0x38, 0xd1, 0x89, 0x06,
    ];
    assert_eq!(raw_scrypt(b"", b"", 4, 1, 1), expected);
}

/// RFC 7914 vector 2: P = "password", S = "NaCl", N = 1024, r = 8, p = 16.
#[test]
fn rfc7914_vector_2_password_nacl() {
    let expected: [u8; 64] = [
        0xfd, 0xba, 0xbe, 0x1c, 0x9d, 0x34, 0x72, 0x00, 0x78, 0x56, 0xe7, 0x19, 0x0d, 0x01, 0xe9,
        0xfe, 0x7c, 0x6a, 0xd7, 0xcb, 0xc8, 0x23, 0x78, 0x30, 0xe7, 0x73, 0x76, 0x63, 0x4b, 0x37,
        0x31, 0x62, 0x2e, 0xaf, 0x30, 0xd9, 0x2e, 0x22, 0xa3, 0x88, 0x6f, 0xf1, 0x09, 0x27, 0x9d,
        0x98, 0x30, 0xda, 0xc7, 0x27, 0xaf, 0xb9, 0x4a, 0x83, 0xee, 0x6d, 0x83, 0x60, 0xcb, 0xdf,
        0xa2, 0xcc, 0x06, 0x40,
    ];
    assert_eq!(raw_scrypt(b"password", b"NaCl", 10, 8, 16), expected);
}

/// `derive()` is plain scrypt truncated to 32 bytes.
#[test]
fn derive_matches_raw_scrypt_prefix() {
    let salt = *b"SodiumChloride!!";
    let params = ScryptParams {
        log_n: 6,
        r: 8,
        p: 1,
    };
    let key = derive(b"pleaseletmein", &salt, &params).expect("derive should succeed");
    let raw = raw_scrypt(b"pleaseletmein", &salt, 6, 8, 1);
    assert_eq!(key.expose().as_slice(), &raw[..32]);
}
