//! Cryptographic error types for `lifelog-crypto-core`.

use thiserror::Error;

/// Errors produced by cryptographic operations.
///
/// Padding failures during field decryption are deliberately absent: they
/// surface as [`crate::symmetric::Decrypted::EmptyOnPadFailure`], not as errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed (scrypt parameter validation, short salt).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Symmetric encryption setup failure (AES-256-CBC).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// CSPRNG failure while generating salts, IVs, or keys.
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}
