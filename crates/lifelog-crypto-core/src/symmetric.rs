//! AES-256-CBC per-field encryption.
//!
//! This module provides:
//! - [`FieldCipher`]: holds one derived key, encrypts and decrypts entry fields
//! - [`Decrypted`]: typed decryption outcome with a fail-soft empty variant
//!
//! Wire format of every encrypted field:
//! `IV (16 bytes) || AES-256-CBC ciphertext (PKCS#7 padded, 16·k bytes)`.
//!
//! Each diary field (title, tags, mood, content) is sealed independently,
//! so a single field can be decrypted on its own and the entry date can
//! stay in plaintext for indexed lookups.

use crate::error::CryptoError;
use crate::memory::SecretBytes;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size in bytes; also the IV length.
pub const BLOCK_LEN: usize = 16;

/// IV length in bytes (one AES block).
pub const IV_LEN: usize = BLOCK_LEN;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Outcome of [`FieldCipher::decrypt`].
///
/// Decryption never raises: malformed, truncated, or empty ciphertext
/// (the reserved image column is always empty) yields
/// [`Decrypted::EmptyOnPadFailure`]. Callers that only display fields use
/// [`Decrypted::into_bytes`], which maps that variant to an empty vector.
#[derive(Clone, PartialEq, Eq)]
pub enum Decrypted {
    /// Padding verified; the recovered plaintext (may itself be empty).
    Plaintext(Vec<u8>),
    /// The input could not be decrypted and unpadded.
    EmptyOnPadFailure,
}

impl Decrypted {
    /// Plaintext bytes, or an empty vector on pad failure.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Plaintext(bytes) => bytes,
            Self::EmptyOnPadFailure => Vec::new(),
        }
    }

    /// Returns `true` if decryption fell back to the empty result.
    #[must_use]
    pub const fn is_pad_failure(&self) -> bool {
        matches!(self, Self::EmptyOnPadFailure)
    }
}

impl fmt::Debug for Decrypted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext(bytes) => write!(f, "Plaintext({} bytes)", bytes.len()),
            Self::EmptyOnPadFailure => f.write_str("EmptyOnPadFailure"),
        }
    }
}

/// AES-256-CBC cipher bound to a single session key.
///
/// The key is owned for the cipher's lifetime and zeroized on drop.
pub struct FieldCipher {
    key: SecretBytes<KEY_LEN>,
}

impl fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldCipher(***)")
    }
}

impl FieldCipher {
    /// Bind a cipher to a derived 256-bit key.
    #[must_use]
    pub const fn new(key: SecretBytes<KEY_LEN>) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` under a fresh random IV.
    ///
    /// Returns `IV || ciphertext`. Two calls on the same plaintext never
    /// produce the same output. Empty plaintext encrypts to one full
    /// padding block.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::SecureMemory` if the CSPRNG fails and
    /// `CryptoError::Encryption` if the cipher cannot be keyed.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut iv = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;

        let encryptor = Aes256CbcEnc::new_from_slices(self.key.expose(), &iv)
            .map_err(|e| CryptoError::Encryption(format!("failed to key AES-256-CBC: {e}")))?;
        let body = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut out = Vec::with_capacity(IV_LEN.saturating_add(body.len()));
        out.extend_from_slice(&iv);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Decrypt `IV || ciphertext` produced by [`encrypt`](Self::encrypt).
    ///
    /// Never fails: anything that cannot be decrypted and unpadded comes
    /// back as [`Decrypted::EmptyOnPadFailure`]. Empty input is the
    /// expected placeholder case and is logged at debug level; other
    /// failures may indicate corruption and are logged at warn level.
    #[must_use]
    pub fn decrypt(&self, ciphertext: &[u8]) -> Decrypted {
        if ciphertext.is_empty() {
            tracing::debug!("empty field ciphertext, returning empty plaintext");
            return Decrypted::EmptyOnPadFailure;
        }

        let Some((iv, body)) = split_iv(ciphertext) else {
            tracing::warn!(
                len = ciphertext.len(),
                "field ciphertext shorter than IV or not block-aligned"
            );
            return Decrypted::EmptyOnPadFailure;
        };

        let Ok(decryptor) = Aes256CbcDec::new_from_slices(self.key.expose(), iv) else {
            tracing::warn!("failed to key AES-256-CBC for decryption");
            return Decrypted::EmptyOnPadFailure;
        };

        decryptor.decrypt_padded_vec_mut::<Pkcs7>(body).map_or_else(
            |_| {
                tracing::warn!(
                    len = ciphertext.len(),
                    "field ciphertext failed padding check (wrong key or corrupted data)"
                );
                Decrypted::EmptyOnPadFailure
            },
            Decrypted::Plaintext,
        )
    }
}

/// Split `IV || body`, requiring a non-empty block-aligned body.
fn split_iv(ciphertext: &[u8]) -> Option<(&[u8], &[u8])> {
    if ciphertext.len() < IV_LEN {
        return None;
    }
    let (iv, body) = ciphertext.split_at(IV_LEN);
    if body.is_empty() || body.len() % BLOCK_LEN != 0 {
        return None;
    }
    Some((iv, body))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
