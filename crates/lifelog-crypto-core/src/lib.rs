//! `lifelog-crypto-core`: Pure cryptographic primitives for Lifelog.
//!
//! Zero I/O, zero database, zero async: password-based key derivation
//! (scrypt), per-field AES-256-CBC encryption, and zeroizing key holders.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod kdf;
pub mod symmetric;

pub use error::CryptoError;
pub use kdf::{derive, generate_salt, verify, ScryptParams, OUTPUT_LEN, SALT_LEN};
pub use memory::SecretBytes;
pub use symmetric::{Decrypted, FieldCipher, BLOCK_LEN, IV_LEN, KEY_LEN};
