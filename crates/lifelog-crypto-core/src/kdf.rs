//! scrypt key derivation and password-hash verification.
//!
//! This module provides:
//! - [`derive`]: derive a 256-bit key from a password + salt using scrypt
//! - [`verify`]: re-derive and compare against a stored hash in constant time
//! - [`generate_salt`]: fresh 16-byte salt from `OsRng`
//! - [`ScryptParams`]: serializable cost parameters (stored inside the vault)
//!
//! # One salt per purpose
//!
//! A vault derives two values from the same password: the working
//! encryption key and the password-verification hash. Each derivation
//! gets its own independently generated salt, so the stored hash never
//! reveals anything about the encryption key.

use crate::error::CryptoError;
use crate::memory::SecretBytes;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Output length of the KDF in bytes (256 bits).
pub const OUTPUT_LEN: usize = 32;

/// Salt length in bytes. Shorter salts are rejected by [`derive`].
pub const SALT_LEN: usize = 16;

/// Default CPU/memory cost exponent: N = 2^14.
const DEFAULT_LOG_N: u8 = 14;

/// Default block size.
const DEFAULT_R: u32 = 8;

/// Default parallelization factor.
const DEFAULT_P: u32 = 1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// scrypt cost parameters.
///
/// Fields use the `scrypt` crate convention: `log_n` is the base-2
/// exponent of N, not N itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// log2 of the CPU/memory cost N.
    pub log_n: u8,
    /// Block size.
    pub r: u32,
    /// Parallelization factor.
    pub p: u32,
}

impl Default for ScryptParams {
    /// N = 2^14, r = 8, p = 1.
    fn default() -> Self {
        Self {
            log_n: DEFAULT_LOG_N,
            r: DEFAULT_R,
            p: DEFAULT_P,
        }
    }
}

impl ScryptParams {
    fn to_scrypt(self) -> Result<scrypt::Params, CryptoError> {
        scrypt::Params::new(self.log_n, self.r, self.p, OUTPUT_LEN)
            .map_err(|e| CryptoError::KeyDerivation(format!("invalid scrypt params: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Core KDF
// ---------------------------------------------------------------------------

/// Generate a fresh random salt.
///
/// Salts are stored in the clear, so the bytes are copied out of the
/// zeroizing buffer.
///
/// # Errors
///
/// Returns `CryptoError::SecureMemory` if the CSPRNG fails.
pub fn generate_salt() -> Result<[u8; SALT_LEN], CryptoError> {
    SecretBytes::<SALT_LEN>::random().map(|salt| *salt.expose())
}

/// Derive a 256-bit key from a password and salt using scrypt.
///
/// Deterministic: the same `(password, salt, params)` always yields the
/// same key, which is what makes password verification by hash
/// comparison possible.
///
/// Password policy (non-empty) is enforced by the vault layer, not here.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if:
/// - The salt is shorter than 16 bytes
/// - The scrypt parameters are invalid
pub fn derive(
    password: &[u8],
    salt: &[u8],
    params: &ScryptParams,
) -> Result<SecretBytes<OUTPUT_LEN>, CryptoError> {
    if salt.len() < SALT_LEN {
        return Err(CryptoError::KeyDerivation(format!(
            "salt too short: {} bytes (minimum {SALT_LEN})",
            salt.len()
        )));
    }

    let scrypt_params = params.to_scrypt()?;

    let mut output = [0u8; OUTPUT_LEN];
    scrypt::scrypt(password, salt, &scrypt_params, &mut output)
        .map_err(|e| CryptoError::KeyDerivation(format!("scrypt derivation failed: {e}")))?;

    let key = SecretBytes::new(output);
    output.zeroize();
    Ok(key)
}

/// Check a password against a stored verification hash.
///
/// Re-derives the hash from `(password, salt)` and compares it with
/// `expected` in constant time. A length mismatch is a plain `false`.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if derivation itself fails.
pub fn verify(
    password: &[u8],
    salt: &[u8],
    params: &ScryptParams,
    expected: &[u8],
) -> Result<bool, CryptoError> {
    let candidate = derive(password, salt, params)?;
    Ok(candidate.expose().as_slice().ct_eq(expected).into())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
