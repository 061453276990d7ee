//! NIST SP 800-38A Appendix F.2.5: CBC-AES256 Known-Answer Test vectors.
//!
//! `FieldCipher::encrypt` picks its own IV, so the vector is checked
//! against the `cbc` crate with the fixed NIST IV, and the resulting
//! `IV || ciphertext` is fed through `FieldCipher::decrypt`.

use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use lifelog_crypto_core::memory::SecretBytes;
use lifelog_crypto_core::symmetric::{Decrypted, FieldCipher, IV_LEN};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

const KEY: [u8; 32] = [
    0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d, 0x77, 0x81,
    0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3, 0x09, 0x14, 0xdf, 0xf4,
];

const IV: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];

const PLAINTEXT: [u8; 64] = [
    0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17, 0x2a,
    0xae, 0x2d, 0x8a, 0x57, 0x1e, 0x03, 0xac, 0x9c, 0x9e, 0xb7, 0x6f, 0xac, 0x45, 0xaf, 0x8e, 0x51,
    0x30, 0xc8, 0x1c, 0x46, 0xa3, 0x5c, 0xe4, 0x11, 0xe5, 0xfb, 0xc1, 0x19, 0x1a, 0x0a, 0x52, 0xef,
    0xf6, 0x9f, 0x24, 0x45, 0xdf, 0x4f, 0x9b, 0x17, 0xad, 0x2b, 0x41, 0x7b, 0xe6, 0x6c, 0x37, 0x10,
];

const CIPHERTEXT: [u8; 64] = [
    0xf5, 0x8c, 0x4c, 0x04, 0xd6, 0xe5, 0xf1, 0xba, 0x77, 0x9e, 0xab, 0xfb, 0x5f, 0x7b, 0xfb, 0xd6,
    0x9c, 0xfc, 0x4e, 0x96, 0x7e, 0xdb, 0x80, 0x8d, 0x67, 0x9f, 0x77, 0x7b, 0xc6, 0x70, 0x2c, 0x7d,
    0x39, 0xf2, 0x33, 0x69, 0xa9, 0xd9, 0xba, 0xcf, 0xa5, 0x30, 0xe2, 0x63, 0x04, 0x23, 0x14, 0x61,
    0xb2, 0xeb, 0x05, 0xe2, 0xc3, 0x9b, 0xe9, 0xfc, 0xda, 0x6c, 0x19, 0x07, 0x8c, 0x6a, 0x9d, 0x1b,
];

#[test]
fn nist_f_2_5_cbc_aes256_encrypt() {
    let ct = Aes256CbcEnc::new(&KEY.into(), &IV.into())
        .encrypt_padded_vec_mut::<NoPadding>(&PLAINTEXT);
    assert_eq!(ct, CIPHERTEXT, "NIST F.2.5 ciphertext mismatch");
}

#[test]
fn field_cipher_decrypts_nist_vector() {
    // With PKCS#7 the four NIST blocks are followed by one full padding block.
    let body = Aes256CbcEnc::new(&KEY.into(), &IV.into()).encrypt_padded_vec_mut::<Pkcs7>(&PLAINTEXT);
    assert_eq!(body.len(), CIPHERTEXT.len() + 16);
    assert_eq!(&body[..CIPHERTEXT.len()], &CIPHERTEXT);

    let mut wire = IV.to_vec();
    wire.extend_from_slice(&body);
    assert_eq!(wire.len(), IV_LEN + body.len());

    let cipher = FieldCipher::new(SecretBytes::new(KEY));
    assert_eq!(cipher.decrypt(&wire), Decrypted::Plaintext(PLAINTEXT.to_vec()));
}

#[test]
fn field_cipher_rejects_unpadded_nist_ciphertext() {
    // The raw NIST ciphertext carries no PKCS#7 block; the last plaintext
    // byte 0x10 happens to be a valid pad length, but the preceding bytes
    // are not all 0x10, so unpadding must fail.
    let mut wire = IV.to_vec();
    wire.extend_from_slice(&CIPHERTEXT);

    let cipher = FieldCipher::new(SecretBytes::new(KEY));
    assert!(cipher.decrypt(&wire).is_pad_failure());
}
