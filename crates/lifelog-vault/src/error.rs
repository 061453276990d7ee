//! Vault error types for `lifelog-vault`.

use lifelog_crypto_core::CryptoError;
use thiserror::Error;

/// Errors produced by vault operations.
///
/// Two outcomes are intentionally *not* errors: a date with no entry
/// (`Ok(None)`) and a field that fails to decrypt (empty field).
#[derive(Debug, Error)]
pub enum VaultError {
    /// Cryptographic operation failed (delegated from crypto-core).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The supplied password does not match the stored verification hash.
    #[error("invalid password")]
    InvalidPassword,

    /// Vault passwords must not be empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// `SQLite` database error.
    #[error("database error: {0}")]
    Database(String),

    /// The file exists but is not an `SQLite` database.
    #[error("not a vault file: {0}")]
    NotAVault(String),

    /// Vault file not found.
    #[error("vault not found: {0}")]
    NotFound(String),

    /// A file already exists at the target path.
    #[error("vault already exists: {0}")]
    VaultAlreadyExists(String),

    /// A required setting is missing from an initialized vault (corruption).
    #[error("vault is missing required setting: {0}")]
    MissingSetting(String),

    /// Date string is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Mood outside the 0–100 range.
    #[error("mood {0} is out of range (0-100)")]
    InvalidMood(u32),

    /// JSON (de)serialization of stored metadata failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Migration error during schema upgrade.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        // SQLITE_NOTADB (code 26): the file is not an SQLite database.
        if let rusqlite::Error::SqliteFailure(ref ffi_err, _) = err {
            if ffi_err.code == rusqlite::ffi::ErrorCode::NotADatabase {
                return Self::NotAVault(err.to_string());
            }
        }
        Self::Database(err.to_string())
    }
}
